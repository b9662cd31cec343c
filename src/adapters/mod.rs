//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements              | Connects to              |
//! |------------|-------------------------|--------------------------|
//! | `ds3231`   | ClockPort               | DS3231 RTC over I²C      |
//! | `hardware` | Clock/Storage/Display/  | bundles the four below   |
//! |            | LiftPort                |                          |
//! | `lcd`      | DisplayPort             | HD44780 16x2, 4-bit bus  |
//! | `log_sink` | EventSink               | Serial log output        |
//! | `nvs`      | StoragePort, ConfigPort | NVS blob / in-memory     |
//! | `relays`   | RelayBank               | 4 GPIO relay coils       |

pub mod ds3231;
pub mod hardware;
pub mod lcd;
pub mod log_sink;
pub mod nvs;
pub mod relays;
