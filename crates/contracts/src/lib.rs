//! Wire contracts shared between the back-office frontend and the server.
//!
//! The server renders table row fragments and answers mutations with
//! tagged JSON; everything crossing that boundary is typed here.

pub mod balance;
pub mod dates;
pub mod debtors;
pub mod hidden_rows;
pub mod list;
pub mod lookup;
pub mod money;
pub mod mutation;
