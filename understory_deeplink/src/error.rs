// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Failure taxonomy for a dispatch attempt.
//!
//! Every variant of [`DispatchError`] is recovered into a failed
//! [`Outcome`](crate::outcome::Outcome); none of them escape from
//! [`DeepLinkDelegate`](crate::delegate::DeepLinkDelegate) as a panic. The
//! `Display` text of the error is the outcome's
//! [`message`](crate::outcome::Outcome::message).

use alloc::string::String;

/// Why a dispatch attempt did not produce a navigation target.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The inbound request carries no URI at all.
    #[error("No Uri in given request.")]
    MissingRequestData,
    /// No registered route table matched the request string.
    #[error("No registered entity to handle deep link: {uri}")]
    NoRouteMatch {
        /// The request string that failed to match.
        uri: String,
    },
    /// The named operation has no overload under either calling convention.
    #[error("Deep link to non-existent method: {operation}")]
    OperationNotFound {
        /// Operation name from the matched route.
        operation: String,
    },
    /// The operation exists but refused to be invoked.
    #[error("Could not deep link to method: {operation} (access denied)")]
    InvocationAccessDenied {
        /// Operation name from the matched route.
        operation: String,
    },
    /// The operation was invoked and reported a failure.
    #[error("Could not deep link to method: {operation} ({reason})")]
    InvocationFailed {
        /// Operation name from the matched route.
        operation: String,
        /// Failure reported by the operation.
        reason: String,
    },
    /// A stack-returning operation produced zero targets.
    #[error("Could not deep link to method: {operation} targets length == 0")]
    EmptyStackProduced {
        /// Operation name from the matched route.
        operation: String,
    },
}

/// Failure reported by an operation overload.
///
/// Operations return this from their body; the
/// [handler resolver](crate::handler::invoke) maps it onto the matching
/// [`DispatchError`] variant together with the operation name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    /// The operation may not be invoked by this caller.
    #[error("access denied")]
    AccessDenied,
    /// The operation ran and failed.
    #[error("{0}")]
    Failed(String),
}

impl InvocationError {
    /// Convenience constructor for [`InvocationError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}
