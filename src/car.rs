//==============================================================================
// Heap value holder
//==============================================================================

/// Driver name used when a car is built from its model.
pub const UNKNOWN_DRIVER: &str = "Unknown";

/// An immutable race car record. The `String` fields live on the heap and are
/// freed when the owning binding goes out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    model: String,
    horse_power: i32,
    driver: String,
}

impl Car {
    /// Builds a car that only knows who drives it. `model` stays empty.
    pub fn from_driver(driver: impl Into<String>, horse_power: i32) -> Self {
        Car {
            model: String::new(),
            horse_power,
            driver: driver.into(),
        }
    }

    /// Builds a car that only knows its model. The driver is always
    /// [`UNKNOWN_DRIVER`]; the trailing flag is accepted and ignored.
    pub fn from_model(model: impl Into<String>, horse_power: i32, _is_model: bool) -> Self {
        Car {
            model: model.into(),
            horse_power,
            driver: UNKNOWN_DRIVER.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn horse_power(&self) -> i32 {
        self.horse_power
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }
}
