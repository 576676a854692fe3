//! The TigoPesa response code catalog.
//!
//! The provider identifies outcomes by literal strings (`BILLER-18-0000-S`
//! and friends). Codes are matched exactly and case-sensitively; anything
//! outside the catalog degrades to [`ResponseCode::UnknownError`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic outcome of a provider operation.
///
/// `InvalidResponse` and `UnknownError` are local sentinels: the provider
/// never sends them, but they flow through the same error reporting path as
/// cataloged codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCode {
    CallbackSuccess,
    CallbackFailed,
    Success,
    UnsupportedGrantType,
    InvalidGrant,
    InternalServiceError,
    /// Username or password is not specified
    EmptyUsernameOrPassword,
    /// Customer MSISDN was not specified
    CustomerMsisdnNotSpecified,
    PasswordNotSpecified,
    InvalidMsisdn,
    NotRegistered,
    BackendError,
    InvalidUsernameOrPassword,
    BillerMsisdnNotSpecified,
    InvalidBillerMsisdn,
    FailedInSumAmount,
    FailedInMinAndMaxAmount,
    FailedInFrequency,
    WrongBillerUsernameOrPassword,
    BillerNotActive,
    InvalidReferenceId,
    ReverseSuccess,
    /// The request went through but the returned response could not be understood
    InvalidResponse,
    /// Fallback for unrecognized provider errors
    UnknownError,
}

impl ResponseCode {
    /// All catalog entries, used for exact reverse lookup.
    const ALL: &'static [ResponseCode] = &[
        Self::CallbackSuccess,
        Self::CallbackFailed,
        Self::Success,
        Self::UnsupportedGrantType,
        Self::InvalidGrant,
        Self::InternalServiceError,
        Self::EmptyUsernameOrPassword,
        Self::CustomerMsisdnNotSpecified,
        Self::PasswordNotSpecified,
        Self::InvalidMsisdn,
        Self::NotRegistered,
        Self::BackendError,
        Self::InvalidUsernameOrPassword,
        Self::BillerMsisdnNotSpecified,
        Self::InvalidBillerMsisdn,
        Self::FailedInSumAmount,
        Self::FailedInMinAndMaxAmount,
        Self::FailedInFrequency,
        Self::WrongBillerUsernameOrPassword,
        Self::BillerNotActive,
        Self::InvalidReferenceId,
        Self::ReverseSuccess,
        Self::InvalidResponse,
        Self::UnknownError,
    ];

    /// The literal string the provider uses on the wire for this code.
    pub fn wire(&self) -> &'static str {
        match self {
            Self::CallbackSuccess => "BILLER-30-0000-S",
            Self::CallbackFailed => "BILLER-30-3030-E",
            Self::Success => "BILLER-18-0000-S",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::InvalidGrant => "invalid_grant",
            Self::InternalServiceError => "DebitMandate-10-1000-E",
            Self::EmptyUsernameOrPassword => "DebitMandate-10-2001-E",
            Self::CustomerMsisdnNotSpecified => "DebitMandate-10-2002-E",
            Self::PasswordNotSpecified => "DebitMandate-10-2003-E",
            Self::InvalidMsisdn => "DebitMandate-10-2004-V",
            Self::NotRegistered => "DebitMandate-10-2005-E",
            Self::BackendError => "DebitMandate-10-5000-E",
            Self::InvalidUsernameOrPassword => "DebitMandate-10-3000-E",
            Self::BillerMsisdnNotSpecified => "DebitMandate-10-2038-V",
            Self::InvalidBillerMsisdn => "BILLER-18-3040-E",
            Self::FailedInSumAmount => "BILLER-18-3018-E",
            Self::FailedInMinAndMaxAmount => "BILLER-18-3019-E",
            Self::FailedInFrequency => "BILLER-18-3020-E",
            Self::WrongBillerUsernameOrPassword => "BILLER-18-3021-E",
            Self::BillerNotActive => "BILLER-18-3022-E",
            Self::InvalidReferenceId => "DebitMandate-10-2020-V",
            Self::ReverseSuccess => "RefundTransaction-20-0000-S",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Exact, case-sensitive catalog lookup of a wire string.
    pub fn from_wire(code: &str) -> Option<ResponseCode> {
        Self::ALL.iter().copied().find(|c| c.wire() == code)
    }

    /// The semantic key for this code, used in logs and error reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CallbackSuccess => "CALLBACK_SUCCESS",
            Self::CallbackFailed => "CALLBACK_FAILED",
            Self::Success => "SUCCESS",
            Self::UnsupportedGrantType => "UNSUPPORTED_GRANT_TYPE",
            Self::InvalidGrant => "INVALID_GRANT",
            Self::InternalServiceError => "INTERNAL_SERVICE_ERROR",
            Self::EmptyUsernameOrPassword => "EMPTY_USERNAME_OR_PASSWORD",
            Self::CustomerMsisdnNotSpecified => "CUSTOMER_MSISDN_NOT_SPECIFIED",
            Self::PasswordNotSpecified => "PASSWORD_NOT_SPECIFIED",
            Self::InvalidMsisdn => "INVALID_MSISDN",
            Self::NotRegistered => "NOT_REGISTERED",
            Self::BackendError => "BACKEND_ERROR",
            Self::InvalidUsernameOrPassword => "INVALID_USERNAME_OR_PASSWORD",
            Self::BillerMsisdnNotSpecified => "BILLER_MSISDN_NOT_SPECIFIED",
            Self::InvalidBillerMsisdn => "INVALID_BILLER_MSISDN",
            Self::FailedInSumAmount => "FAILED_IN_SUM_AMOUNT",
            Self::FailedInMinAndMaxAmount => "FAILED_IN_MIN_AND_MAX_AMOUNT",
            Self::FailedInFrequency => "FAILED_IN_FREQUENCY",
            Self::WrongBillerUsernameOrPassword => "WRONG_BILLER_USERNAME_OR_PASSWORD",
            Self::BillerNotActive => "BILLER_NOT_ACTIVE",
            Self::InvalidReferenceId => "INVALID_REFERENCE_ID",
            Self::ReverseSuccess => "REVERSE_SUCCESS",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl AsRef<str> for ResponseCode {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
