//! Error codes for the bridge executor.
//!
//! Codes are grouped in ranges so that relayers and indexers can classify a
//! failure without a lookup table:
//!
//! | Range     | Category                                   |
//! |-----------|--------------------------------------------|
//! | 1 – 9     | Lifecycle / initialisation                 |
//! | 10 – 19   | Admission (unauthorised transport/origin)  |
//! | 20 – 29   | Payload decoding                           |
//! | 30 – 39   | Queueing                                   |
//! | 40 – 49   | ActionsSet lifecycle                       |
//! | 50 – 59   | Authorisation                              |
//! | 60 – 69   | Configuration validation                   |
//! | 70 – 79   | Execution                                  |

use soroban_sdk::contracttype;

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ExecutorError {
    // Lifecycle (1-9)
    NotInitialized = 1,
    AlreadyInitialized = 2,

    // Admission (10-19)
    UnauthorizedTransport = 10,
    UnauthorizedChainId = 11,
    UnauthorizedController = 12,

    // Decoding (20-29)
    MalformedPayload = 20,
    EmptyTargets = 21,
    InconsistentParamsLength = 22,
    InvalidActionValue = 23,

    // Queueing (30-39)
    DuplicateAction = 30,

    // Lifecycle (40-49)
    InvalidActionsSetId = 40,
    TimelockNotFinished = 41,
    ActionsSetNotQueued = 42,

    // Authorisation (50-59)
    OnlyCallableByThis = 50,
    OnlyByGuardian = 51,
    OnlyBeforeExecuted = 52,
    AlreadyCanceled = 53,
    BridgeMismatch = 54,

    // Configuration (60-69)
    DelayShorterThanMin = 60,
    DelayLongerThanMax = 61,
    GracePeriodTooShort = 62,
    InvalidInitParams = 63,

    // Execution (70-79)
    FailedActionExecution = 70,
    InsufficientBalance = 71,
}

/// Coarse classification of an [`ExecutorError`].
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    Lifecycle = 1,
    Admission = 2,
    Decode = 3,
    Queue = 4,
    ActionsSetLifecycle = 5,
    Authorization = 6,
    ConfigValidation = 7,
    Execution = 8,
}

impl From<ExecutorError> for ErrorCategory {
    fn from(error: ExecutorError) -> Self {
        match error {
            ExecutorError::NotInitialized | ExecutorError::AlreadyInitialized => {
                ErrorCategory::Lifecycle
            }

            ExecutorError::UnauthorizedTransport
            | ExecutorError::UnauthorizedChainId
            | ExecutorError::UnauthorizedController => ErrorCategory::Admission,

            ExecutorError::MalformedPayload
            | ExecutorError::EmptyTargets
            | ExecutorError::InconsistentParamsLength
            | ExecutorError::InvalidActionValue => ErrorCategory::Decode,

            ExecutorError::DuplicateAction => ErrorCategory::Queue,

            ExecutorError::InvalidActionsSetId
            | ExecutorError::TimelockNotFinished
            | ExecutorError::ActionsSetNotQueued => ErrorCategory::ActionsSetLifecycle,

            ExecutorError::OnlyCallableByThis
            | ExecutorError::OnlyByGuardian
            | ExecutorError::OnlyBeforeExecuted
            | ExecutorError::AlreadyCanceled
            | ExecutorError::BridgeMismatch => ErrorCategory::Authorization,

            ExecutorError::DelayShorterThanMin
            | ExecutorError::DelayLongerThanMax
            | ExecutorError::GracePeriodTooShort
            | ExecutorError::InvalidInitParams => ErrorCategory::ConfigValidation,

            ExecutorError::FailedActionExecution | ExecutorError::InsufficientBalance => {
                ErrorCategory::Execution
            }
        }
    }
}
