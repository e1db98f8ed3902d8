use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(MedicineFrequency {
    Morning => "morning",
    Afternoon => "afternoon",
    Evening => "evening",
    Night => "night",
    BeforeBreakfast => "before_breakfast",
    AfterBreakfast => "after_breakfast",
    BeforeLunch => "before_lunch",
    AfterLunch => "after_lunch",
    BeforeDinner => "before_dinner",
    AfterDinner => "after_dinner",
    OnceDaily => "once_daily",
    TwiceDaily => "twice_daily",
    ThriceDaily => "thrice_daily",
    AsNeeded => "as_needed",
    Custom => "custom",
});

str_enum!(QuantityUnit {
    Tablets => "tablets",
    Capsules => "capsules",
    Ml => "ml",
    Mg => "mg",
    Pieces => "pieces",
});
