use crate::common::UserId;
use crate::domains::accounts::User;
use crate::domains::rides::error::RideError;
use crate::domains::rides::models::PaymentToken;
use crate::kernel::ServerKernel;

pub async fn register_payment_token(
    user_id: UserId,
    token: &str,
    kernel: &ServerKernel,
) -> Result<PaymentToken, RideError> {
    if User::find_by_id(user_id, &kernel.db_pool).await?.is_none() {
        return Err(RideError::UserNotFound(user_id));
    }
    Ok(PaymentToken::upsert(user_id, token, &kernel.db_pool).await?)
}
