// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared across the workspace.

/// Generate a `Display` impl that maps enum variants to string literals.
///
/// Data-carrying variants use `(..)` or `{ .. }` to ignore their fields.
///
/// ```ignore
/// crate::simple_display! {
///     Rejection {
///         Denylisted => "denylisted",
///         TooFast { .. } => "too_fast",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($ignore:tt)* ))? $({ $($brace:tt)* })? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($ignore)* ))? $({ $($brace)* })? => $str, )+
                })
            }
        }
    };
}
