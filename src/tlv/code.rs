//! Closed sets of wire codes.
//!
//! Protocols, frame codes, and parameter types all appear on the wire as a
//! single byte. In memory, each of them is a closed enum whose variants map
//! to these bytes. The [`Code`] trait describes this mapping and the
//! [`tlv_enum!`][crate::tlv_enum] macro generates such an enum together
//! with its trait implementation.

use core::{fmt, hash};

//------------ Code ----------------------------------------------------------

/// A value represented on the wire by a single byte.
pub trait Code: Copy + Eq + hash::Hash + fmt::Debug + Sized + 'static {
    /// Returns the value for a wire code if there is one.
    fn from_int(value: u8) -> Option<Self>;

    /// Returns the wire code of the value.
    fn to_int(self) -> u8;

    /// Returns a human readable name of the value.
    fn name(self) -> &'static str;
}

//------------ tlv_enum! -----------------------------------------------------

/// Creates a closed enum of wire codes.
///
/// The macro takes optional attributes for the type, its visibility and
/// name, and a list of variants with their wire code and name:
///
/// ```
/// bytewire::tlv_enum! {
///     /// The frames of a ping protocol.
///     =>
///     pub PingFrame;
///
///     (Ping => 1, "Ping")
///     (Pong => 2, "Pong")
/// }
///
/// assert_eq!(PingFrame::from_int(2), Some(PingFrame::Pong));
/// assert_eq!(PingFrame::Ping.to_int(), 1);
/// assert_eq!(PingFrame::Pong.to_string(), "Pong");
/// assert_eq!(PingFrame::from_int(3), None);
/// ```
///
/// The enum derives `Clone`, `Copy`, `Debug`, `Eq`, `Hash`, and
/// `PartialEq` and implements [`Code`], `Display` (printing the name), and
/// conversion into `u8`. Wire codes must be unique.
#[macro_export]
macro_rules! tlv_enum {
    ( $(#[$attr:meta])* =>
      $vis:vis $name:ident;
      $( $(#[$variant_attr:meta])* ( $variant:ident =>
                                        $value:expr, $mnemonic:expr) )+ ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        $vis enum $name {
            $(
                $(#[$variant_attr])*
                $variant,
            )+
        }

        impl $name {
            /// Returns the value for a wire code if there is one.
            #[must_use]
            pub const fn from_int(value: u8) -> Option<Self> {
                $(
                    if value == $value {
                        return Some($name::$variant)
                    }
                )+
                None
            }

            /// Returns the wire code of the value.
            #[must_use]
            pub const fn to_int(self) -> u8 {
                match self {
                    $( $name::$variant => $value, )+
                }
            }

            /// Returns the name of the value.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $mnemonic, )+
                }
            }
        }

        impl $crate::tlv::Code for $name {
            fn from_int(value: u8) -> Option<Self> {
                $name::from_int(value)
            }

            fn to_int(self) -> u8 {
                $name::to_int(self)
            }

            fn name(self) -> &'static str {
                $name::name(self)
            }
        }

        //--- From

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.to_int()
            }
        }

        //--- Display

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::Code;

    crate::tlv_enum! {
        =>
        Colour;

        (Red => 0, "Red")
        (Green => 7, "Green")
        /// The last one.
        (Blue => 0xFF, "Blue")
    }

    #[test]
    fn codes() {
        assert_eq!(Colour::from_int(0), Some(Colour::Red));
        assert_eq!(Colour::from_int(7), Some(Colour::Green));
        assert_eq!(Colour::from_int(255), Some(Colour::Blue));
        assert_eq!(Colour::from_int(1), None);
        assert_eq!(u8::from(Colour::Green), 7);
        assert_eq!(Colour::Blue.to_string(), "Blue");
    }

    #[test]
    fn trait_matches_inherent() {
        fn round_trip<C: Code>(code: C) -> Option<C> {
            C::from_int(code.to_int())
        }

        for colour in [Colour::Red, Colour::Green, Colour::Blue] {
            assert_eq!(round_trip(colour), Some(colour));
            assert_eq!(Code::name(colour), colour.name());
        }
    }
}
