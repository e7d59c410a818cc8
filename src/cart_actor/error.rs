/// Errors from talking to the cart actor.
///
/// Remote failures are not errors here: the store absorbs them and the next
/// refetch decides what the cart looks like.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Cart actor closed")]
    ActorClosed,
    #[error("Cart actor dropped response channel")]
    ActorDropped,
}
