mod relay;

pub(crate) use relay::INTERNAL_MESSAGE;
pub use relay::RelayError;

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
