//! SNMP 请求封装
//!
//! `SnmpTransport` 把 walk/get/get-next 抽象出来，便于在测试中替换。
//! 响应中的值会被复制为自有数据，不再借用会话缓冲区。

use std::net::ToSocketAddrs;
use std::time::{Duration, Instant};

use snmp::{SyncSession, Value};
use zmb_core::{MapBuilderError, Result};

use crate::format_oid;

/// getbulk 每次最多返回的行数
const MAX_REPETITIONS: u32 = 10;

/// 自有的 SNMP 值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnmpValue {
    OctetString(Vec<u8>),
    Integer(i64),
    Unsigned(u64),
    Null,
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    Other,
}

impl SnmpValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::OctetString(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// 是否为 noSuchObject / noSuchInstance / endOfMibView
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Self::NoSuchObject | Self::NoSuchInstance | Self::EndOfMibView
        )
    }
}

impl From<Value<'_>> for SnmpValue {
    fn from(value: Value<'_>) -> Self {
        match value {
            Value::OctetString(bytes) => Self::OctetString(bytes.to_vec()),
            Value::IpAddress(addr) => Self::OctetString(addr.to_vec()),
            Value::Integer(n) => Self::Integer(n),
            Value::Counter32(n) | Value::Unsigned32(n) | Value::Timeticks(n) => {
                Self::Unsigned(u64::from(n))
            }
            Value::Counter64(n) => Self::Unsigned(n),
            Value::Null => Self::Null,
            _ => Self::Other,
        }
    }
}

/// 一个变量绑定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnmpEntry {
    pub oid: Vec<u32>,
    pub value: SnmpValue,
}

/// 一次请求的结果
#[derive(Debug, Clone, Default)]
pub struct SnmpResponse {
    pub duration: Duration,
    pub entries: Vec<SnmpEntry>,
}

/// SNMP 操作
pub trait SnmpTransport {
    /// 遍历 `root` 之下的整棵子树
    fn walk_bulk(&mut self, root: &[u32]) -> Result<SnmpResponse>;

    /// 逐个获取，异常值 (noSuch*) 会被丢弃
    fn get(&mut self, oids: &[Vec<u32>]) -> Result<SnmpResponse>;

    /// 获取每个 OID 的下一个值，异常值会被丢弃
    fn get_next(&mut self, oids: &[Vec<u32>]) -> Result<SnmpResponse>;
}

/// 基于 `snmp::SyncSession` 的 SNMPv2c 会话
pub struct SnmpSession {
    session: SyncSession,
    target: String,
}

impl SnmpSession {
    pub fn connect(host: &str, port: u16, community: &str, timeout: Duration) -> Result<Self> {
        let target = format!("{host}:{port}");
        let addr = target
            .to_socket_addrs()
            .map_err(|e| MapBuilderError::Snmp(format!("cannot resolve '{target}': {e}")))?
            .next()
            .ok_or_else(|| MapBuilderError::Snmp(format!("no address found for '{target}'")))?;

        let session = SyncSession::new(addr, community.as_bytes(), Some(timeout), 0)
            .map_err(|e| MapBuilderError::Snmp(format!("cannot open session to '{target}': {e}")))?;

        Ok(Self { session, target })
    }

    fn request(&mut self, kind: Request, oid: &[u32]) -> Result<Vec<SnmpEntry>> {
        let pdu = match kind {
            Request::Get => self.session.get(oid),
            Request::GetNext => self.session.getnext(oid),
            Request::GetBulk => self.session.getbulk(&[oid], 0, MAX_REPETITIONS),
        }
        .map_err(|e| {
            MapBuilderError::Snmp(format!(
                "{kind:?} {} on '{}' failed: {e:?}",
                format_oid(oid),
                self.target
            ))
        })?;

        if pdu.error_status != 0 {
            return Err(MapBuilderError::Snmp(format!(
                "{kind:?} {} on '{}' returned error status {} (index {})",
                format_oid(oid),
                self.target,
                pdu.error_status,
                pdu.error_index
            )));
        }

        let mut buf = [0u32; 128];
        let mut entries = Vec::new();
        for (name, value) in pdu.varbinds {
            let oid = name
                .read_name(&mut buf)
                .map_err(|e| MapBuilderError::Snmp(format!("malformed OID in response: {e:?}")))?
                .to_vec();
            entries.push(SnmpEntry {
                oid,
                value: value.into(),
            });
        }
        Ok(entries)
    }

    fn collect(&mut self, kind: Request, oids: &[Vec<u32>]) -> Result<SnmpResponse> {
        let started = Instant::now();
        let mut entries = Vec::new();
        for oid in oids {
            entries.extend(
                self.request(kind, oid)?
                    .into_iter()
                    .filter(|e| !e.value.is_exception()),
            );
        }
        Ok(SnmpResponse {
            duration: started.elapsed(),
            entries,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Request {
    Get,
    GetNext,
    GetBulk,
}

impl SnmpTransport for SnmpSession {
    fn walk_bulk(&mut self, root: &[u32]) -> Result<SnmpResponse> {
        let started = Instant::now();
        let mut entries: Vec<SnmpEntry> = Vec::new();
        let mut cursor = root.to_vec();

        'walk: loop {
            let batch = self.request(Request::GetBulk, &cursor)?;
            if batch.is_empty() {
                break;
            }

            for entry in batch {
                if !entry.oid.starts_with(root) || entry.value == SnmpValue::EndOfMibView {
                    break 'walk;
                }
                // 防止代理返回不递增的 OID 导致死循环
                if entry.oid <= cursor {
                    return Err(MapBuilderError::Snmp(format!(
                        "agent '{}' returned a non-increasing OID {}",
                        self.target,
                        format_oid(&entry.oid)
                    )));
                }
                cursor = entry.oid.clone();
                entries.push(entry);
            }
        }

        Ok(SnmpResponse {
            duration: started.elapsed(),
            entries,
        })
    }

    fn get(&mut self, oids: &[Vec<u32>]) -> Result<SnmpResponse> {
        self.collect(Request::Get, oids)
    }

    fn get_next(&mut self, oids: &[Vec<u32>]) -> Result<SnmpResponse> {
        self.collect(Request::GetNext, oids)
    }
}
