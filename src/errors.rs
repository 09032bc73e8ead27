// ============================================================
// Error messages
//
// Every failure is a user error whose message starts with its
// category, so callers (and tests) can tell them apart.
// ============================================================

// ── Unauthorized ──
pub const ERR_NOT_ADMIN: &str = "Unauthorized: caller is not an admin";
pub const ERR_NOT_AI_AGENT: &str = "Unauthorized: caller is not an AI agent";
pub const ERR_NOT_GUARDIAN: &str = "Unauthorized: caller is not a guardian";
pub const ERR_CANNOT_MANAGE_ROLES: &str = "Unauthorized: caller cannot manage roles";
pub const ERR_CANNOT_SET_PARAMETERS: &str = "Unauthorized: caller cannot change parameters";
pub const ERR_CANNOT_PAUSE: &str = "Unauthorized: caller cannot pause";
pub const ERR_CANNOT_UNPAUSE: &str = "Unauthorized: caller cannot unpause";
pub const ERR_CANNOT_CANCEL: &str = "Unauthorized: caller cannot cancel this proposal";
pub const ERR_BELOW_PROPOSAL_THRESHOLD: &str =
    "Unauthorized: voting power below proposal threshold";
pub const ERR_NO_VOTING_POWER: &str = "Unauthorized: no voting power";

// ── InvalidState ──
pub const ERR_PROPOSAL_NOT_ACTIVE: &str = "InvalidState: proposal is not active";
pub const ERR_VOTING_CLOSED: &str = "InvalidState: voting period has ended";
pub const ERR_VOTING_NOT_ENDED: &str = "InvalidState: voting period has not ended";
pub const ERR_PROPOSAL_NOT_SUCCEEDED: &str = "InvalidState: proposal has not succeeded";
pub const ERR_PROPOSAL_NOT_QUEUED: &str = "InvalidState: proposal is not queued";
pub const ERR_TIMELOCK_ACTIVE: &str = "InvalidState: timelock has not elapsed";
pub const ERR_NOT_CANCELLABLE: &str = "InvalidState: proposal can no longer be cancelled";
pub const ERR_PARAMETER_TYPE_MISMATCH: &str =
    "InvalidState: parameter is registered with another type";
pub const ERR_PARAMETER_OUT_OF_RANGE: &str = "InvalidState: parameter value out of range";
pub const ERR_LAST_ADMIN: &str = "InvalidState: cannot revoke the last admin";
pub const ERR_ALREADY_PAUSED: &str = "InvalidState: already paused";
pub const ERR_NOT_PAUSED: &str = "InvalidState: not paused";

// ── InvalidArgument ──
pub const ERR_ZERO_AMOUNT: &str = "InvalidArgument: amount must be greater than zero";
pub const ERR_WRONG_STAKE_TOKEN: &str = "InvalidArgument: wrong stake token";
pub const ERR_INVALID_BPS: &str = "InvalidArgument: basis points above 10000";
pub const ERR_INVALID_PERIOD: &str = "InvalidArgument: period must be greater than zero";
pub const ERR_INVALID_THRESHOLD: &str =
    "InvalidArgument: custom threshold must be between the default threshold and 10000";
pub const ERR_INVALID_TOKEN: &str = "InvalidArgument: invalid token identifier";
pub const ERR_ZERO_ADDRESS: &str = "InvalidArgument: zero address";
pub const ERR_EMPTY_KEY: &str = "InvalidArgument: empty parameter key";

// ── LimitExceeded ──
pub const ERR_DAILY_LIMIT_EXCEEDED: &str = "LimitExceeded: daily spending limit exceeded";
pub const ERR_TOTAL_LIMIT_EXCEEDED: &str = "LimitExceeded: total spending limit exceeded";
pub const ERR_NO_SPENDING_LIMIT: &str = "LimitExceeded: no spending limit configured";
pub const ERR_AGENT_COOLDOWN: &str = "LimitExceeded: agent action cooldown active";

// ── NotFound ──
pub const ERR_PROPOSAL_NOT_FOUND: &str = "NotFound: proposal does not exist";
pub const ERR_ASSET_NOT_FOUND: &str = "NotFound: asset is not registered";
pub const ERR_PARAMETER_NOT_FOUND: &str = "NotFound: parameter is not set";
pub const ERR_ROLE_NOT_HELD: &str = "NotFound: account does not hold the role";

// ── InsufficientFunds ──
pub const ERR_INSUFFICIENT_TREASURY_BALANCE: &str =
    "InsufficientFunds: treasury balance too low";
pub const ERR_INSUFFICIENT_STAKE: &str = "InsufficientFunds: amount exceeds stake";
pub const ERR_NO_PENALTIES: &str = "InsufficientFunds: no retained penalties";

// ── AlreadyDone ──
pub const ERR_ALREADY_VOTED: &str = "AlreadyDone: already voted";
pub const ERR_ASSET_ALREADY_REGISTERED: &str = "AlreadyDone: asset already registered";
pub const ERR_ALREADY_EXECUTED: &str = "AlreadyDone: proposal already executed";
pub const ERR_ROLE_ALREADY_GRANTED: &str = "AlreadyDone: role already granted";

// ── Paused ──
pub const ERR_PAUSED: &str = "Paused: operation not allowed while paused";
