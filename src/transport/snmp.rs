use async_trait::async_trait;
use rand::Rng;
use snmp2::v3::{Auth, AuthProtocol as UsmAuth, Cipher, Security};
use snmp2::{AsyncSession, Oid, Value};
use std::fmt::Debug;
use tokio::time::timeout;

use super::SnmpTransport;
use crate::error::{Error, Result};
use crate::models::{AuthProtocol, PrivProtocol, SnmpProfile, SnmpVersion};
use crate::settings::ConnectorSettings;
use crate::snmp::{normalize_oid, SnmpValue};

/// Network SNMP client on top of `snmp2::AsyncSession`.
pub struct SnmpClient {
    session: AsyncSession,
    target: String,
    profile: SnmpProfile,
    community: String,
    settings: ConnectorSettings,
}

fn to_oid(oid: &str) -> Result<Oid<'static>> {
    let parts: std::result::Result<Vec<u64>, _> = normalize_oid(oid)
        .split('.')
        .map(|p| p.parse::<u64>())
        .collect();
    let parts = parts.map_err(|e| Error::protocol(format!("Invalid OID {}", oid)).with_details(e.to_string()))?;
    Oid::from(&parts).map_err(|e| Error::protocol(format!("Invalid OID {}", oid)).with_details(format!("{:?}", e)))
}

fn from_value(value: &Value<'_>) -> SnmpValue {
    match value {
        Value::Integer(i) => SnmpValue::Integer(*i),
        Value::OctetString(s) => SnmpValue::OctetString(s.to_vec()),
        Value::ObjectIdentifier(oid) => SnmpValue::ObjectId(oid.to_id_string()),
        Value::IpAddress(ip) => SnmpValue::IpAddress(*ip),
        Value::Counter32(c) => SnmpValue::Counter32(*c),
        Value::Unsigned32(u) => SnmpValue::Unsigned32(*u),
        Value::Timeticks(t) => SnmpValue::Timeticks(*t),
        Value::Counter64(c) => SnmpValue::Counter64(*c),
        Value::Null => SnmpValue::Null,
        _ => SnmpValue::Other,
    }
}

/// Map a library error to our taxonomy. snmp2 errors carry no kind we can
/// match on across versions, so classify on the debug rendering.
fn classify<E: Debug>(context: &str, err: E) -> Error {
    let details = format!("{:?}", err);
    if details.contains("Auth") || details.contains("Security") {
        Error::auth(format!("{}: SNMP authentication failed", context)).with_details(details)
    } else {
        Error::protocol(format!("{}: SNMP request failed", context)).with_details(details)
    }
}

fn usm_auth(protocol: AuthProtocol) -> UsmAuth {
    match protocol {
        AuthProtocol::Md5 => UsmAuth::Md5,
        AuthProtocol::Sha1 => UsmAuth::Sha1,
        AuthProtocol::Sha256 => UsmAuth::Sha256,
        AuthProtocol::Sha512 => UsmAuth::Sha512,
    }
}

fn usm_cipher(protocol: PrivProtocol) -> Cipher {
    match protocol {
        PrivProtocol::Des => Cipher::Des,
        PrivProtocol::Aes128 => Cipher::Aes128,
        PrivProtocol::Aes256 => Cipher::Aes256,
    }
}

impl SnmpClient {
    /// Open a session to `address` (host or host:port).
    pub async fn connect(address: &str, profile: &SnmpProfile, settings: &ConnectorSettings) -> Result<Self> {
        check_context(profile)?;
        let target = if address.contains(':') && !address.starts_with('[') && address.matches(':').count() == 1 {
            address.to_string()
        } else {
            format!("{}:{}", address, profile.port)
        };
        let community = profile.community.clone();
        let session = Self::open(&target, profile, &community, settings).await?;
        Ok(Self {
            session,
            target,
            profile: profile.clone(),
            community,
            settings: settings.clone(),
        })
    }

    async fn open(
        target: &str,
        profile: &SnmpProfile,
        community: &str,
        settings: &ConnectorSettings,
    ) -> Result<AsyncSession> {
        let req_id: i32 = rand::thread_rng().gen_range(1..i32::MAX / 2);
        let opening = async {
            match profile.version {
                SnmpVersion::V1 => AsyncSession::new_v1(target, community.as_bytes(), req_id)
                    .await
                    .map_err(|e| Error::protocol(format!("Cannot open SNMP session to {}", target)).with_details(e.to_string())),
                SnmpVersion::V2c => AsyncSession::new_v2c(target, community.as_bytes(), req_id)
                    .await
                    .map_err(|e| Error::protocol(format!("Cannot open SNMP session to {}", target)).with_details(e.to_string())),
                SnmpVersion::V3 => {
                    let creds = profile
                        .v3
                        .as_ref()
                        .ok_or_else(|| Error::auth("SNMPv3 profile has no credentials"))?;
                    let auth_pass = creds.auth_password.clone().unwrap_or_default();
                    let security = Security::new(creds.username.as_bytes(), auth_pass.as_bytes())
                        .with_auth_protocol(usm_auth(creds.auth_protocol));
                    let security = match (&creds.auth_password, &creds.priv_password) {
                        (Some(_), Some(privacy)) => security.with_auth(Auth::AuthPriv {
                            cipher: usm_cipher(creds.priv_protocol),
                            privacy_password: privacy.as_bytes().to_vec(),
                        }),
                        (Some(_), None) => security.with_auth(Auth::AuthNoPriv),
                        _ => security.with_auth(Auth::NoAuthNoPriv),
                    };
                    let mut session = AsyncSession::new_v3(target, req_id, security)
                        .await
                        .map_err(|e| Error::protocol(format!("Cannot open SNMP session to {}", target)).with_details(e.to_string()))?;
                    session.init().await.map_err(|e| classify(target, e))?;
                    Ok(session)
                }
            }
        };
        tokio::select! {
            _ = settings.cancel.cancelled() => Err(Error::cancelled()),
            res = timeout(settings.snmp_timeout, opening) => match res {
                Ok(session) => session,
                Err(_) => Err(Error::timeout(format!("Timeout opening SNMP session to {}", target))),
            },
        }
    }

    /// One GETBULK (or GETNEXT on v1) step after `oid`.
    async fn next_batch(&mut self, oid: &Oid<'_>) -> Result<Vec<(String, SnmpValue)>> {
        let Self { session, target, profile, settings, .. } = self;
        let v1 = profile.version == SnmpVersion::V1;
        let max_repetitions = settings.max_repetitions;
        for attempt in 0..=settings.snmp_retries {
            let request = async {
                if v1 {
                    session.getnext(oid).await.map(|pdu| {
                        pdu.varbinds
                            .map(|(o, v)| (o.to_id_string(), from_value(&v)))
                            .collect::<Vec<_>>()
                    })
                } else {
                    session.getbulk(&[oid], 0, max_repetitions).await.map(|pdu| {
                        pdu.varbinds
                            .map(|(o, v)| (o.to_id_string(), from_value(&v)))
                            .collect::<Vec<_>>()
                    })
                }
            };
            tokio::select! {
                _ = settings.cancel.cancelled() => return Err(Error::cancelled()),
                res = timeout(settings.snmp_timeout, request) => match res {
                    Ok(Ok(batch)) => return Ok(batch),
                    Ok(Err(e)) => return Err(classify(target, e)),
                    Err(_) => tracing::debug!("SNMP walk step to {} timed out (attempt {})", target, attempt + 1),
                },
            }
        }
        Err(timed_out("walk", target, settings))
    }
}

fn timed_out(what: &str, target: &str, settings: &ConnectorSettings) -> Error {
    Error::timeout(format!("SNMP {} to {} timed out", what, target)).with_details(format!(
        "{} attempts of {:?}",
        settings.snmp_retries + 1,
        settings.snmp_timeout
    ))
}

#[async_trait]
impl SnmpTransport for SnmpClient {
    async fn get(&mut self, oid: &str) -> Result<Option<SnmpValue>> {
        let request_oid = to_oid(oid)?;
        let Self { session, target, settings, .. } = self;
        for attempt in 0..=settings.snmp_retries {
            let request = async {
                session
                    .get(&request_oid)
                    .await
                    .map(|mut pdu| pdu.varbinds.next().map(|(_, v)| from_value(&v)))
            };
            tokio::select! {
                _ = settings.cancel.cancelled() => return Err(Error::cancelled()),
                res = timeout(settings.snmp_timeout, request) => match res {
                    Ok(Ok(value)) => return Ok(value.filter(|v| !v.is_missing())),
                    Ok(Err(e)) => return Err(classify(target, e)),
                    Err(_) => tracing::debug!("SNMP GET {} on {} timed out (attempt {})", oid, target, attempt + 1),
                },
            }
        }
        Err(timed_out("GET", target, settings))
    }

    async fn walk(&mut self, branch: &str) -> Result<Vec<(String, SnmpValue)>> {
        let branch = normalize_oid(branch).to_string();
        let prefix = format!("{}.", branch);
        let mut results = Vec::new();
        let mut current = branch.clone();

        'walk: loop {
            let batch = self.next_batch(&to_oid(&current)?).await?;
            if batch.is_empty() {
                break;
            }
            for (oid, value) in batch {
                // Out of the branch, end of MIB view, or an agent looping back.
                if !oid.starts_with(&prefix) || value.is_missing() || oid == current {
                    break 'walk;
                }
                current = oid.clone();
                results.push((oid, value));
            }
        }
        Ok(results)
    }

    async fn set(&mut self, varbinds: &[(String, SnmpValue)]) -> Result<()> {
        let oids = varbinds
            .iter()
            .map(|(oid, _)| to_oid(oid))
            .collect::<Result<Vec<_>>>()?;
        let mut values = Vec::with_capacity(varbinds.len());
        for (oid, (_, value)) in oids.iter().zip(varbinds) {
            let v = match value {
                SnmpValue::Integer(i) => Value::Integer(*i),
                SnmpValue::OctetString(b) => Value::OctetString(b),
                SnmpValue::IpAddress(ip) => Value::IpAddress(*ip),
                SnmpValue::Counter32(c) => Value::Counter32(*c),
                SnmpValue::Unsigned32(u) => Value::Unsigned32(*u),
                SnmpValue::Timeticks(t) => Value::Timeticks(*t),
                SnmpValue::Counter64(c) => Value::Counter64(*c),
                other => {
                    return Err(Error::protocol(format!(
                        "Cannot SET {} with value {:?}",
                        oid.to_id_string(),
                        other
                    )))
                }
            };
            values.push((oid, v));
        }

        // Writes are sent once; a lost response is reported, not retried.
        let Self { session, target, settings, .. } = self;
        let request = async { session.set(&values).await.map(|pdu| (pdu.error_status, pdu.error_index)) };
        tokio::select! {
            _ = settings.cancel.cancelled() => Err(Error::cancelled()),
            res = timeout(settings.snmp_timeout, request) => match res {
                Ok(Ok((0, _))) => Ok(()),
                Ok(Ok((status, index))) => Err(Error::protocol(format!("SNMP SET on {} rejected", target))
                    .with_details(format!("error-status {} at varbind {}", status, index))),
                Ok(Err(e)) => Err(classify(target, e)),
                Err(_) => Err(Error::timeout(format!("SNMP SET to {} timed out", target))),
            },
        }
    }

    async fn for_vlan(&self, vlan_id: u16) -> Result<Box<dyn SnmpTransport>> {
        let community = vlan_community(&self.profile, &self.community, vlan_id)?;
        let session = Self::open(&self.target, &self.profile, &community, &self.settings).await?;
        Ok(Box::new(SnmpClient {
            session,
            target: self.target.clone(),
            profile: self.profile.clone(),
            community,
            settings: self.settings.clone(),
        }))
    }
}

/// snmp2 never puts a contextName into the scoped PDU, so a profile asking
/// for one cannot be honoured.
fn check_context(profile: &SnmpProfile) -> Result<()> {
    match profile.context.as_deref() {
        Some(context) if !context.is_empty() => Err(Error::unsupported(format!(
            "SNMP context \"{}\" cannot be selected by the SNMP client",
            context
        ))),
        _ => Ok(()),
    }
}

/// Community addressing a VLAN's bridge instance (`community@vid`). SNMPv3
/// needs the `vlan-<vid>` context instead, which the client cannot send.
fn vlan_community(profile: &SnmpProfile, community: &str, vlan_id: u16) -> Result<String> {
    match profile.version {
        SnmpVersion::V3 => Err(Error::unsupported(format!(
            "SNMPv3 context vlan-{} cannot be selected by the SNMP client",
            vlan_id
        ))),
        _ => Ok(format!("{}@{}", community, vlan_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::SnmpV3Credentials;

    fn v3_profile() -> SnmpProfile {
        SnmpProfile {
            version: SnmpVersion::V3,
            v3: Some(SnmpV3Credentials {
                username: "monitor".into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_vlan_community() {
        let v2c = SnmpProfile::default();
        assert_eq!(vlan_community(&v2c, "public", 20).unwrap(), "public@20");
        let err = vlan_community(&v3_profile(), "public", 20).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
        assert!(err.description.contains("vlan-20"));
    }

    #[test]
    fn test_context_is_rejected() {
        assert!(check_context(&v3_profile()).is_ok());
        let mut profile = v3_profile();
        profile.context = Some("vlan-30".into());
        let err = check_context(&profile).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
        profile.context = Some(String::new());
        assert!(check_context(&profile).is_ok());
    }

    #[tokio::test]
    async fn test_connect_with_context_fails_before_network() {
        let mut profile = v3_profile();
        profile.context = Some("mgmt".into());
        let err = SnmpClient::connect("192.0.2.1", &profile, &ConnectorSettings::default())
            .await
            .err()
            .unwrap();
        assert!(err.is(ErrorKind::UnsupportedOperation));
    }
}
