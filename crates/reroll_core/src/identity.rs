//! Device identity generation
//!
//! A reset replaces three identifier fields in the storage document.
//! Two are 64-char lowercase hex strings (32 random bytes), one is a
//! random UUID v4. All three come from the OS CSPRNG via `thread_rng`.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key for the primary machine identifier
pub const KEY_MACHINE_ID: &str = "telemetry.machineId";

/// Storage key for the secondary (historically macOS-derived) identifier
pub const KEY_MAC_MACHINE_ID: &str = "telemetry.macMachineId";

/// Storage key for the device UUID
pub const KEY_DEV_DEVICE_ID: &str = "telemetry.devDeviceId";

/// Entropy per hex identifier, before encoding
const MACHINE_ID_BYTES: usize = 32;

/// One freshly generated set of device identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// 64 lowercase hex chars
    pub machine_id: String,
    /// 64 lowercase hex chars, sampled independently of `machine_id`
    pub mac_machine_id: String,
    /// Hyphenated lowercase UUID v4
    pub dev_device_id: String,
}

impl DeviceIdentity {
    /// Generate a fresh identity
    pub fn generate() -> Self {
        Self {
            machine_id: random_hex_id(),
            mac_machine_id: random_hex_id(),
            dev_device_id: Uuid::new_v4().to_string(),
        }
    }

    /// The storage keys and values this identity writes, in storage order
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (KEY_MACHINE_ID, self.machine_id.as_str()),
            (KEY_MAC_MACHINE_ID, self.mac_machine_id.as_str()),
            (KEY_DEV_DEVICE_ID, self.dev_device_id.as_str()),
        ]
    }
}

fn random_hex_id() -> String {
    let mut bytes = [0u8; MACHINE_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_ids_are_64_lowercase_hex_chars() {
        let identity = DeviceIdentity::generate();
        for id in [&identity.machine_id, &identity.mac_machine_id] {
            assert_eq!(id.len(), 64);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_device_id_is_uuid_v4() {
        let identity = DeviceIdentity::generate();
        let parsed = Uuid::parse_str(&identity.dev_device_id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(parsed.get_variant(), uuid::Variant::RFC4122);
        // to_string() renders hyphenated lowercase
        assert_eq!(identity.dev_device_id.len(), 36);
        assert_eq!(identity.dev_device_id, identity.dev_device_id.to_lowercase());
    }

    #[test]
    fn test_fields_are_sampled_independently() {
        let identity = DeviceIdentity::generate();
        assert_ne!(identity.machine_id, identity.mac_machine_id);
    }

    #[test]
    fn test_repeated_generation_never_collides() {
        let mut seen = HashSet::new();
        for _ in 0..16 {
            let identity = DeviceIdentity::generate();
            assert!(seen.insert(identity.machine_id));
            assert!(seen.insert(identity.mac_machine_id));
            assert!(seen.insert(identity.dev_device_id));
        }
    }

    #[test]
    fn test_pairs_cover_all_three_keys() {
        let identity = DeviceIdentity::generate();
        let keys: Vec<&str> = identity.pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![KEY_MACHINE_ID, KEY_MAC_MACHINE_ID, KEY_DEV_DEVICE_ID]);
    }
}
