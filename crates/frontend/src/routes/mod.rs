use crate::pages::{
    balance::BalancePage, cash_flow::CashFlowPage, clients::ClientsPage, debtors::DebtorsPage,
    exchange::ExchangePage, money_transfers::MoneyTransfersPage, suppliers::SuppliersPage,
    transactions::TransactionsPage, users::UsersPage,
};
use leptos::prelude::*;

/// Страница, на которой смонтировано приложение.
///
/// Навигация между разделами остаётся серверной, поэтому вместо
/// роутера достаточно одного сопоставления по pathname при старте.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Transactions,
    Suppliers,
    Clients,
    Users,
    CashFlow,
    MoneyTransfers,
    Exchange,
    Debtors,
    Balance,
    Unknown,
}

pub fn match_route(pathname: &str) -> Route {
    let path = pathname.trim_end_matches('/');
    match path {
        "" | "/transactions" => Route::Transactions,
        "/suppliers" => Route::Suppliers,
        "/clients" => Route::Clients,
        "/users" => Route::Users,
        "/cash-flow" => Route::CashFlow,
        "/money-transfers" => Route::MoneyTransfers,
        "/exchange" => Route::Exchange,
        "/debtors-office" => Route::Debtors,
        "/balance" => Route::Balance,
        _ => Route::Unknown,
    }
}

fn current_route() -> Route {
    let pathname = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    match_route(&pathname)
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let route = current_route();
    log::debug!("mounting page controller for {route:?}");

    match route {
        Route::Transactions => view! { <TransactionsPage /> }.into_any(),
        Route::Suppliers => view! { <SuppliersPage /> }.into_any(),
        Route::Clients => view! { <ClientsPage /> }.into_any(),
        Route::Users => view! { <UsersPage /> }.into_any(),
        Route::CashFlow => view! { <CashFlowPage /> }.into_any(),
        Route::MoneyTransfers => view! { <MoneyTransfersPage /> }.into_any(),
        Route::Exchange => view! { <ExchangePage /> }.into_any(),
        Route::Debtors => view! { <DebtorsPage /> }.into_any(),
        Route::Balance => view! { <BalancePage /> }.into_any(),
        Route::Unknown => ().into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_matching_ignores_trailing_slash() {
        assert_eq!(match_route("/suppliers/"), Route::Suppliers);
        assert_eq!(match_route("/suppliers"), Route::Suppliers);
        assert_eq!(match_route("/"), Route::Transactions);
        assert_eq!(match_route("/money-transfers/"), Route::MoneyTransfers);
        assert_eq!(match_route("/nonexistent/"), Route::Unknown);
    }

    #[test]
    fn transfers_and_exchange_are_separate_routes() {
        assert_eq!(match_route("/exchange/"), Route::Exchange);
        assert_ne!(match_route("/exchange"), match_route("/money-transfers"));
    }
}
