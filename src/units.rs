//! This module defines various unit types and their conversions.
//!
//! The base units follow the conventions of the host model: energy in MWh, time in hours and heat
//! rates in MMBtu/MWh.

/// The number of MWh in a GWh
pub const MWH_PER_GWH: f64 = 1000.0;

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            serde::Deserialize,
            serde::Serialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                $name(iter.map(|x| x.0).sum())
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

/// Represents a dimensionless quantity (e.g. a fraction).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    serde::Deserialize,
    serde::Serialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Display,
)]
pub struct Dimensionless(pub f64);

impl Dimensionless {
    /// Creates a new dimensionless value
    pub fn new(val: f64) -> Self {
        Self(val)
    }

    /// Returns the value as a f64
    pub fn value(self) -> f64 {
        self.0
    }
}

// Base quantities
unit_struct!(Energy);
unit_struct!(Hours);

// Derived quantities
unit_struct!(HeatRate);

// Division rules
impl_div!(Energy, Energy, Dimensionless);

impl Energy {
    /// Convert from the base energy unit (MWh) to GWh
    pub fn to_gwh(self) -> f64 {
        self.0 / MWH_PER_GWH
    }
}
