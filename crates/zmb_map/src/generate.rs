//! 由 CDP 邻居生成主机映射

use zmb_core::{CdpNeighbor, Mapping};

/// 触发器模式中代表接口名的占位符
pub const INTERFACE_PLACEHOLDER: &str = "#INTERFACE";

/// 映射生成选项
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// 触发器模式，可包含 `#INTERFACE`
    pub trigger_pattern: String,
    pub local_image: String,
    pub remote_image: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            trigger_pattern: String::new(),
            local_image: "Switch_(64)".to_string(),
            remote_image: "Switch_(64)".to_string(),
        }
    }
}

/// 每个邻居生成一条以 `local_hostname` 为本端的映射
pub fn generate_mappings(
    neighbors: &[CdpNeighbor],
    local_hostname: &str,
    opts: &GenerateOptions,
) -> Vec<Mapping> {
    neighbors
        .iter()
        .map(|neighbor| Mapping {
            local_host: local_hostname.to_string(),
            local_interface: neighbor.local_port.clone(),
            local_trigger_pattern: trigger_pattern(&opts.trigger_pattern, &neighbor.local_port),
            local_image: opts.local_image.clone(),
            remote_host: neighbor.device_id.clone(),
            remote_interface: neighbor.port.clone(),
            remote_trigger_pattern: trigger_pattern(&opts.trigger_pattern, &neighbor.port),
            remote_image: opts.remote_image.clone(),
        })
        .collect()
}

/// 用接口名替换占位符；模式为空时返回空串
pub fn trigger_pattern(pattern: &str, interface: &str) -> String {
    pattern.replace(INTERFACE_PLACEHOLDER, interface)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor(device_id: &str, port: &str, local_port: &str) -> CdpNeighbor {
        CdpNeighbor {
            device_id: device_id.to_string(),
            port: port.to_string(),
            local_port: local_port.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_trigger_pattern() {
        assert_eq!(
            trigger_pattern("Operation Status of #INTERFACE", "eth0"),
            "Operation Status of eth0"
        );
        assert_eq!(trigger_pattern("Link down", "eth0"), "Link down");
        assert_eq!(trigger_pattern("", "eth0"), "");
        assert_eq!(trigger_pattern("#INTERFACE/#INTERFACE", "Gi0/1"), "Gi0/1/Gi0/1");
    }

    #[test]
    fn test_generate_mappings() {
        let neighbors = vec![
            neighbor("router-2", "GigabitEthernet0/2", "GigabitEthernet0/1"),
            neighbor("switch-1", "Fa0/24", "GigabitEthernet0/3"),
        ];
        let opts = GenerateOptions {
            trigger_pattern: "Interface #INTERFACE(): Link down".to_string(),
            local_image: "Router_(64)".to_string(),
            ..Default::default()
        };

        let mappings = generate_mappings(&neighbors, "router-1", &opts);

        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].local_host, "router-1");
        assert_eq!(mappings[0].local_interface, "GigabitEthernet0/1");
        assert_eq!(
            mappings[0].local_trigger_pattern,
            "Interface GigabitEthernet0/1(): Link down"
        );
        assert_eq!(mappings[0].local_image, "Router_(64)");
        assert_eq!(mappings[1].remote_host, "switch-1");
        assert_eq!(mappings[1].remote_interface, "Fa0/24");
        assert_eq!(mappings[1].remote_trigger_pattern, "Interface Fa0/24(): Link down");
        assert_eq!(mappings[1].remote_image, "Switch_(64)");
    }

    #[test]
    fn test_generate_without_pattern() {
        let mappings = generate_mappings(
            &[neighbor("router-2", "eth1", "eth0")],
            "router-1",
            &GenerateOptions::default(),
        );
        assert_eq!(mappings[0].local_trigger_pattern, "");
        assert_eq!(mappings[0].remote_trigger_pattern, "");
    }
}
