//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter     | Implements         | Connects to                 |
//! |-------------|--------------------|-----------------------------|
//! | `sim_hw`    | SensorPort         | Simulated soil/env sensors  |
//! |             | ActuatorPort       | Simulated pump              |
//! | `log_sink`  | EventSink          | `log` facade                |
//! | `storage`   | ConfigPort         | In-memory / JSON file store |
//! |             | StoragePort        |                             |
//! | `time`      | -                  | Host monotonic clock        |

pub mod log_sink;
pub mod sim_hw;
pub mod storage;
pub mod time;
