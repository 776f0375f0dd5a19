//! Collection and ordering of pre-reset callbacks.

use crate::diagnostics::{DiagnosticCategory, Diagnostics};
use crate::metadata::{token::Token, typedef::TypeDefinition};

/// Default order value for callbacks whose marker declares none.
pub const DEFAULT_ORDER: i32 = 0;

/// A qualified unload callback: a method reference plus its declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnloadCallback {
    /// Token of the callback method. Always declared on the type it protects.
    pub method: Token,
    /// Declared order value; lower runs earlier.
    pub order: i32,
}

/// Finds a type's unload callbacks and sorts them ascending by order value.
///
/// A method qualifies when it is static, takes no type parameters, no
/// parameters, returns nothing, and carries the pre-reset marker. The order
/// value is read from the marker's `order` argument; an absent or unreadable
/// value falls back to [`DEFAULT_ORDER`] (unreadable values additionally
/// produce a warning diagnostic). The sort is stable, but the relative order
/// of callbacks with equal order values is not part of the contract.
///
/// Ordering is scoped per type only; no cross-type ordering exists.
#[must_use]
pub fn collect_callbacks(type_def: &TypeDefinition, diagnostics: &Diagnostics) -> Vec<UnloadCallback> {
    let mut callbacks: Vec<UnloadCallback> = type_def
        .methods
        .iter()
        .filter(|m| m.is_unload_callback())
        .filter_map(|method| {
            let marker = method.unload_marker()?;
            let order = match marker.i4_arg("order") {
                Some(value) => value,
                None => {
                    if marker.has_arg("order") {
                        diagnostics.warning(
                            DiagnosticCategory::Marker,
                            format!(
                                "Unreadable order value on callback '{}.{}', using default {}",
                                type_def.full_name(),
                                method.name,
                                DEFAULT_ORDER
                            ),
                        );
                    }
                    DEFAULT_ORDER
                }
            };
            Some(UnloadCallback {
                method: method.token,
                order,
            })
        })
        .collect();

    callbacks.sort_by_key(|c| c.order);
    callbacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::MethodBody;
    use crate::metadata::{
        marker::{Marker, MarkerArg, MarkerKind},
        method::Method,
    };

    fn callback(token: Token, name: &str, order: Option<MarkerArg>) -> Method {
        let mut marker = Marker::new(MarkerKind::ResetOnUnload);
        if let Some(value) = order {
            marker = marker.with_arg("order", value);
        }
        Method::new_static(token, name, MethodBody::empty()).with_marker(marker)
    }

    #[test]
    fn test_sorted_ascending_by_order() {
        let mut ty = TypeDefinition::new(Token::type_def(1), "Game", "Session");
        ty.methods.push(callback(
            Token::method(1),
            "Late",
            Some(MarkerArg::I4(100)),
        ));
        ty.methods
            .push(callback(Token::method(2), "Early", Some(MarkerArg::I4(0))));

        let diagnostics = Diagnostics::new();
        let callbacks = collect_callbacks(&ty, &diagnostics);
        assert_eq!(
            callbacks,
            vec![
                UnloadCallback {
                    method: Token::method(2),
                    order: 0
                },
                UnloadCallback {
                    method: Token::method(1),
                    order: 100
                },
            ]
        );
    }

    #[test]
    fn test_missing_order_defaults_silently() {
        let mut ty = TypeDefinition::new(Token::type_def(1), "Game", "Session");
        ty.methods.push(callback(Token::method(1), "OnReset", None));

        let diagnostics = Diagnostics::new();
        let callbacks = collect_callbacks(&ty, &diagnostics);
        assert_eq!(callbacks[0].order, DEFAULT_ORDER);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unreadable_order_defaults_with_warning() {
        let mut ty = TypeDefinition::new(Token::type_def(1), "Game", "Session");
        ty.methods.push(callback(
            Token::method(1),
            "OnReset",
            Some(MarkerArg::String("first".to_string())),
        ));

        let diagnostics = Diagnostics::new();
        let callbacks = collect_callbacks(&ty, &diagnostics);
        assert_eq!(callbacks[0].order, DEFAULT_ORDER);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_non_qualifying_methods_skipped() {
        let mut ty = TypeDefinition::new(Token::type_def(1), "Game", "Session");
        // No marker at all.
        ty.methods.push(Method::new_static(
            Token::method(1),
            "Plain",
            MethodBody::empty(),
        ));
        // Marked but takes a parameter.
        let mut with_param = callback(Token::method(2), "Bad", None);
        with_param.param_count = 1;
        ty.methods.push(with_param);

        let diagnostics = Diagnostics::new();
        assert!(collect_callbacks(&ty, &diagnostics).is_empty());
    }

    #[test]
    fn test_negative_orders_run_first() {
        let mut ty = TypeDefinition::new(Token::type_def(1), "Game", "Session");
        ty.methods
            .push(callback(Token::method(1), "A", Some(MarkerArg::I4(5))));
        ty.methods
            .push(callback(Token::method(2), "B", Some(MarkerArg::I4(-10))));

        let diagnostics = Diagnostics::new();
        let callbacks = collect_callbacks(&ty, &diagnostics);
        assert_eq!(callbacks[0].method, Token::method(2));
    }
}
