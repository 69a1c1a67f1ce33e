//! Category-scoped revocation reasons.
//!
//! Each content category defines its own reason enum. Numeric codes are only
//! meaningful within that category: code `1` is `FRAUD` for documents but
//! `OUTDATED` for datasets. The registry is generic over the enum so the two
//! can never be mixed up at compile time.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A revocation reason enum with a distinguished `NONE` value.
///
/// `NONE` marks an identifier that has not been revoked; it is never an
/// acceptable argument to a revoke call.
pub trait RevocationReason:
    Copy + Eq + Hash + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The "not revoked" value, wire code `0`.
    const NONE: Self;

    /// Wire code (`uint8`).
    fn code(self) -> u8;

    /// Parse a wire code; `None` for codes outside the enum.
    fn from_code(code: u8) -> Option<Self>;

    /// Upper-case label, e.g. `"OWNER_REQUEST"`.
    fn label(self) -> &'static str;

    /// Every value, `NONE` first.
    fn all() -> &'static [Self];

    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Parse a label, case-insensitively, accepting `-` for `_`.
    fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().replace('-', "_").to_ascii_uppercase();
        Self::all().iter().copied().find(|r| r.label() == wanted)
    }

    /// Every value except `NONE`.
    fn revocable() -> Vec<Self> {
        Self::all().iter().copied().filter(|r| !r.is_none()).collect()
    }
}

/// Declare a category's reason enum and implement [`RevocationReason`] for it.
///
/// The enum must contain a `None = 0` variant.
///
/// ```
/// bth_revocation::revocation_reasons! {
///     pub enum TicketReason {
///         None = 0 => "NONE",
///         Refunded = 1 => "REFUNDED",
///     }
/// }
/// use bth_revocation::RevocationReason;
/// assert_eq!(TicketReason::from_code(1), Some(TicketReason::Refunded));
/// ```
#[macro_export]
macro_rules! revocation_reasons {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[repr(u8)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $code ),+
        }

        impl $crate::RevocationReason for $name {
            const NONE: Self = $name::None;

            fn code(self) -> u8 {
                self as u8
            }

            fn from_code(code: u8) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )+
                    _ => None,
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }

            fn all() -> &'static [Self] {
                &[ $( Self::$variant ),+ ]
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::RevocationReason::label(*self))
            }
        }
    };
}
