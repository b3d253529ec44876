/// Side effects the reducer asks the runtime to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// POST the begin-tracking request to the gateway.
    BeginTracking,
    /// GET the current commit feed from the gateway.
    FetchCommits,
    /// DELETE the remote commit store via the gateway.
    ClearRemote,
    StartPolling,
    StopPolling,
    StartAutoAdvance,
    StopAutoAdvance,
}
