//! `define_port_error!`: failure enums for driven ports.
//!
//! Each adapter-facing port declares its failures as a list of
//! `Variant { field: Type } => "display format"` lines. The macro expands
//! that into a `thiserror` enum plus one snake-case constructor per variant
//! taking `impl Into<Type>` for every field, so adapters can write
//! `UserPersistenceError::query(err.to_string())` or pass `&str` directly.

macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub const fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),+ }) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant { $($field: $field.into()),+ }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),+ $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( {
                    $(
                        #[doc = concat!("`", stringify!($field), "` reported with this failure.")]
                        $field : $ty
                    ),+
                } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),+ } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Generated constructors and display text.
    define_port_error! {
        pub enum SamplePortError {
            Gone => "gone",
            Missing { key: String } => "missing {key}",
            Rejected { status: u16, reason: String } => "rejected with {status}: {reason}",
        }
    }

    #[test]
    fn unit_variants_get_const_constructors() {
        const GONE: SamplePortError = SamplePortError::gone();
        assert_eq!(GONE.to_string(), "gone");
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        let err = SamplePortError::missing("episode");
        assert_eq!(
            err,
            SamplePortError::Missing {
                key: "episode".to_owned()
            }
        );
        assert_eq!(err.to_string(), "missing episode");
    }

    #[test]
    fn mixed_fields_keep_their_order() {
        let err = SamplePortError::rejected(502_u16, "bad gateway");
        assert_eq!(err.to_string(), "rejected with 502: bad gateway");
    }
}
