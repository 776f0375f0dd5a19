use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers the failure modes of the transformation engine (module analysis, unit
/// synthesis, initializer instrumentation) and of the runtime half (dispatch registry,
/// orchestrated reload cycles, body interpretation). Each variant carries enough context
/// to make the failure actionable for the host.
///
/// # Error Categories
///
/// ## Transformation Errors
/// - [`Error::AlreadyInstrumented`] - Module was already run through the transformer
/// - [`Error::DuplicateInitializer`] - A type declares more than one type initializer
/// - [`Error::GenericContext`] - A declaring type's generic parameters could not be resolved
/// - [`Error::TypeNotFound`] - A referenced type is not present in the module
///
/// ## Resolution Errors
/// - [`Error::FieldNotFound`] - A field reference does not resolve inside its declaring type
/// - [`Error::MethodNotFound`] - A method reference does not resolve inside its declaring type
///
/// ## Runtime Errors
/// - [`Error::CallbackFailed`] - A registered unload/load callable raised during invocation
/// - [`Error::MissingBody`] - An invoked method carries no executable body
/// - [`Error::Malformed`] - An executable body is structurally invalid (e.g. stack underflow)
#[derive(Error, Debug)]
pub enum Error {
    /// The module has already been instrumented for static-state reset.
    ///
    /// The transformation is specified as single-pass only; running it a second
    /// time over its own output is invalid input, not an idempotent no-op.
    #[error("Module '{0}' is already reset-instrumented; the transformation is single-pass")]
    AlreadyInstrumented(String),

    /// A type declares more than one type initializer.
    ///
    /// Well-formed modules carry at most one `.cctor` per type. This indicates
    /// the input model was hand-built incorrectly rather than produced by a
    /// compiler.
    #[error("Type '{type_name}' declares more than one type initializer")]
    DuplicateInitializer {
        /// Full name of the offending type
        type_name: String,
    },

    /// A generic declaring context could not be resolved while re-qualifying a
    /// member reference.
    ///
    /// This aborts transformation of the whole module: emitting the reference
    /// unqualified would produce a module that fails at load time, and the
    /// engine guarantees all-or-nothing output per module.
    #[error("Cannot resolve generic context for declaring type {declaring}: {message}")]
    GenericContext {
        /// Token of the declaring type whose parameters could not be resolved
        declaring: Token,
        /// Description of what could not be resolved
        message: String,
    },

    /// A referenced type is not present in the module being processed.
    #[error("Type {0} was not found in the module")]
    TypeNotFound(Token),

    /// A field reference does not resolve inside its declaring type.
    #[error("Field {field} was not found on type {declaring}")]
    FieldNotFound {
        /// Token of the missing field
        field: Token,
        /// Token of the declaring type that was searched
        declaring: Token,
    },

    /// A method reference does not resolve inside its declaring type.
    #[error("Method {method} was not found on type {declaring}")]
    MethodNotFound {
        /// Token of the missing method
        method: Token,
        /// Token of the declaring type that was searched
        declaring: Token,
    },

    /// A registered unload or load callable raised during channel invocation.
    ///
    /// Propagates out of [`crate::runtime::DispatchRegistry::invoke`] to the
    /// orchestrator, which contains it at the cycle boundary.
    #[error("Reset callable failed: {message}")]
    CallbackFailed {
        /// Description of the failure raised by the callable
        message: String,
    },

    /// An invoked method carries no executable body.
    #[error("Method {0} has no body to execute")]
    MissingBody(Token),

    /// An executable body is structurally invalid.
    ///
    /// The error includes the source location where the malformation was
    /// detected for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AlreadyInstrumented("Game.Core".to_string());
        assert!(err.to_string().contains("Game.Core"));

        let err = Error::TypeNotFound(Token::new(0x02000007));
        assert!(err.to_string().contains("0x02000007"));
    }

    #[test]
    fn test_malformed_macro() {
        let err: Error = malformed_error!("stack underflow at {}", 3);
        match err {
            Error::Malformed { message, .. } => assert_eq!(message, "stack underflow at 3"),
            _ => panic!("expected Malformed"),
        }
    }

    #[test]
    fn test_generic_context_display() {
        let err = Error::GenericContext {
            declaring: Token::new(0x02000001),
            message: "type is not part of the module".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("0x02000001"));
        assert!(text.contains("not part of the module"));
    }
}
