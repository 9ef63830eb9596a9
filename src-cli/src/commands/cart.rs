//! Cart badge command
use serde::Serialize;

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CartInfo {
    pub item_count: u32,
    pub is_authenticated: bool,
}

pub async fn cart(state: &AppState) -> CommandResult<CartInfo> {
    let item_count = state.sessions().fetch_cart_count().await;
    CommandResult::ok(CartInfo {
        item_count,
        is_authenticated: state.sessions().is_authenticated(),
    })
}
