/// Defines a newtype identifier over an integer column (typically `i64`)
/// and generates:
/// - derives (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
/// - `Display` and `FromStr`
/// - `From<$inner> for $name` and `From<$name> for $inner`
///
/// Identifiers serialize transparently, so `ContractId(7)` is `7` on the wire.
///
/// Usage:
///   define_id_type!(i64, ContractId);
#[macro_export]
macro_rules! define_id_type {
    ($inner:ty, $name:ident) => {
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = <$inner as ::std::str::FromStr>::Err;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                s.trim().parse::<$inner>().map($name)
            }
        }

        impl ::std::convert::From<$inner> for $name {
            fn from(v: $inner) -> Self {
                $name(v)
            }
        }

        impl ::std::convert::From<$name> for $inner {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl $name {
            pub fn new(value: $inner) -> Self {
                $name(value)
            }

            pub fn value(&self) -> $inner {
                self.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::define_id_type!(i64, SampleId);

    #[test]
    fn test_id_roundtrips_through_inner() {
        let id = SampleId::new(42);
        let raw: i64 = id.into();
        assert_eq!(raw, 42);
        assert_eq!(SampleId::from(raw), id);
    }

    #[test]
    fn test_id_parses_and_displays() {
        let id: SampleId = " 17 ".parse().unwrap();
        assert_eq!(id.value(), 17);
        assert_eq!(id.to_string(), "17");
        assert!("abc".parse::<SampleId>().is_err());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&SampleId::new(5)).unwrap();
        assert_eq!(json, "5");
    }
}
