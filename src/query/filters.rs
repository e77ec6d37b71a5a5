//! Search filter dimensions and their values
//!
//! Each dimension holds at most one selected value. The closed dimensions use
//! the catalog's own labels as wire values, so `as_wire` output can be sent
//! unchanged as a query parameter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A filterable attribute of a substance
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    DangerousNumber,
    AggregationState,
    DensityWater,
    DensityAir,
    Solubility,
    GeneralDanger,
    WaterDanger,
}

impl FilterDimension {
    pub const ALL: [Self; 7] = [
        Self::DangerousNumber,
        Self::AggregationState,
        Self::DensityWater,
        Self::DensityAir,
        Self::Solubility,
        Self::GeneralDanger,
        Self::WaterDanger,
    ];

    /// Query parameter name used by the catalog
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::DangerousNumber => "dangerousNumber",
            Self::AggregationState => "aggregationState",
            Self::DensityWater => "densityWater",
            Self::DensityAir => "densityAir",
            Self::Solubility => "solubility",
            Self::GeneralDanger => "generalDanger",
            Self::WaterDanger => "waterDanger",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Label the catalog uses for this value
            #[must_use]
            pub const fn as_wire(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_wire())
            }
        }
    };
}

wire_enum! {
    /// Physical state under normal conditions
    AggregationState {
        Gaseous => "Газоподібний",
        Liquid => "Рідкий",
        Solid => "Твердий",
        Transitional => "Перехідний",
    }
}

wire_enum! {
    /// Vapour density relative to air
    DensityAir {
        Lighter => "Легша за повітря",
        Same => "Однакова з повітрям",
        Heavier => "Важча за повітря",
    }
}

wire_enum! {
    /// Density relative to water
    DensityWater {
        Lighter => "Легша за воду",
        Same => "Однакова з водою",
        Heavier => "Важча за воду",
    }
}

wire_enum! {
    GeneralDanger {
        Flammable => "Горюча",
        Explosive => "Вибухонебезпечна",
        Radioactive => "Радіоактивна",
    }
}

wire_enum! {
    Solubility {
        Soluble => "Водорозчинна",
        LimitedSoluble => "Обмежено-розчинна",
        NotSoluble => "Нерозчинна",
    }
}

wire_enum! {
    /// Whether water may be used on the substance
    WaterDanger {
        NotRecommended => "Обережно з водою",
        Forbidden => "Заборонено воду",
        Absent => "Відсутня",
    }
}

/// A selected value for one dimension
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    /// Kemler hazard identification number, matched as text
    DangerousNumber(String),
    AggregationState(AggregationState),
    DensityWater(DensityWater),
    DensityAir(DensityAir),
    Solubility(Solubility),
    GeneralDanger(GeneralDanger),
    WaterDanger(WaterDanger),
}

impl FilterValue {
    #[must_use]
    pub const fn dimension(&self) -> FilterDimension {
        match self {
            Self::DangerousNumber(_) => FilterDimension::DangerousNumber,
            Self::AggregationState(_) => FilterDimension::AggregationState,
            Self::DensityWater(_) => FilterDimension::DensityWater,
            Self::DensityAir(_) => FilterDimension::DensityAir,
            Self::Solubility(_) => FilterDimension::Solubility,
            Self::GeneralDanger(_) => FilterDimension::GeneralDanger,
            Self::WaterDanger(_) => FilterDimension::WaterDanger,
        }
    }

    /// Value as sent to the catalog
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::DangerousNumber(number) => number.trim(),
            Self::AggregationState(v) => v.as_wire(),
            Self::DensityWater(v) => v.as_wire(),
            Self::DensityAir(v) => v.as_wire(),
            Self::Solubility(v) => v.as_wire(),
            Self::GeneralDanger(v) => v.as_wire(),
            Self::WaterDanger(v) => v.as_wire(),
        }
    }

    /// A blank free-text value selects nothing
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.as_wire().is_empty()
    }
}

/// Current selection across all dimensions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    selected: BTreeMap<FilterDimension, FilterValue>,
}

impl Filters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `value` for its dimension, replacing any previous selection
    ///
    /// A blank value clears the dimension instead.
    pub fn set(&mut self, value: FilterValue) {
        let dimension = value.dimension();
        if value.is_blank() {
            self.selected.remove(&dimension);
        } else {
            self.selected.insert(dimension, value);
        }
    }

    /// Builder-style `set`
    #[must_use]
    pub fn with(mut self, value: FilterValue) -> Self {
        self.set(value);
        self
    }

    /// Unset one dimension; returns the previous selection
    pub fn clear(&mut self, dimension: FilterDimension) -> Option<FilterValue> {
        self.selected.remove(&dimension)
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn get(&self, dimension: FilterDimension) -> Option<&FilterValue> {
        self.selected.get(&dimension)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// `(param, value)` pairs for every selected dimension, in dimension order
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        self.selected
            .iter()
            .map(|(dimension, value)| (dimension.param(), value.as_wire().to_string()))
            .collect()
    }
}
