pub mod balance;
pub mod cash_flow;
pub mod clients;
pub mod debtors;
pub mod exchange;
pub mod money_transfers;
pub mod suppliers;
pub mod transactions;
pub mod users;
