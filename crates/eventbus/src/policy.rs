/// How a [`crate::Subscription`] behaves when it falls far enough behind
/// that the channel's buffered events wrap around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackpressurePolicy {
    /// Silently skip ahead to the oldest still-buffered event. Appropriate
    /// for high-frequency progress events where only the latest state
    /// matters to a slow consumer.
    DropOldest,
    /// Surface the number of skipped events to the caller via
    /// [`RecvOutcome::Lagged`] instead of masking the gap.
    ReportLag,
}

/// Result of one [`crate::Subscription::recv`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecvOutcome<T> {
    /// An event was delivered.
    Event(T),
    /// The subscriber lagged and the policy is [`BackpressurePolicy::ReportLag`].
    Lagged(u64),
    /// The room was closed and every buffered event has been drained.
    Closed,
}
