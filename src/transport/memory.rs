//! In-memory transports: a table-driven SNMP agent and a scripted CLI.
//! Used by the Dummy connector tests and by every SNMP connector test.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{CommandTransport, SnmpTransport};
use crate::error::{Error, Result};
use crate::snmp::{normalize_oid, parse_oid, SnmpValue};

type Table = BTreeMap<Vec<u32>, SnmpValue>;

#[derive(Default)]
struct AgentState {
    /// `None` is the default context; `Some(vid)` a per-VLAN bridge instance.
    tables: HashMap<Option<u16>, Table>,
    calls: usize,
    sets: Vec<(String, SnmpValue)>,
    failures: Vec<(Vec<u32>, Error)>,
    /// On a SET below `.0`, store `.2` at `.1` + the same index.
    set_mirrors: Vec<(Vec<u32>, Vec<u32>, SnmpValue)>,
    /// On a SET below `.0`, store the row index itself at `.1` + index.
    index_mirrors: Vec<(Vec<u32>, Vec<u32>)>,
    scope_refusal: Option<Error>,
}

/// SNMP agent backed by sorted OID tables. Clones share state, so a test
/// can keep a handle while the connector owns another.
#[derive(Clone, Default)]
pub struct MemoryAgent {
    state: Arc<Mutex<AgentState>>,
    vlan: Option<u16>,
}

fn key(oid: &str) -> Vec<u32> {
    parse_oid(oid).unwrap_or_default()
}

fn render(key: &[u32]) -> String {
    key.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(".")
}

impl MemoryAgent {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AgentState> {
        // A panicking test thread must not hide the agent from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add or replace one object in the default context.
    pub fn insert(&self, oid: &str, value: SnmpValue) -> &Self {
        self.lock().tables.entry(None).or_default().insert(key(oid), value);
        self
    }

    /// Add or replace one object in a VLAN's bridge instance.
    pub fn insert_vlan(&self, vlan_id: u16, oid: &str, value: SnmpValue) -> &Self {
        self.lock()
            .tables
            .entry(Some(vlan_id))
            .or_default()
            .insert(key(oid), value);
        self
    }

    /// Every request touching `branch` fails with `error`.
    pub fn fail_on(&self, branch: &str, error: Error) -> &Self {
        self.lock().failures.push((key(branch), error));
        self
    }

    /// When a SET lands at `trigger.<index>`, also store `value` at
    /// `target.<index>` (simulates agent-side state machines such as a
    /// config copy row finishing).
    pub fn mirror_set(&self, trigger: &str, target: &str, value: SnmpValue) -> &Self {
        self.lock().set_mirrors.push((key(trigger), key(target), value));
        self
    }

    /// When a SET lands at `trigger.<index>`, store `<index>` as an
    /// integer at `target.<index>` (result tables pointing back at the
    /// request row).
    pub fn mirror_index(&self, trigger: &str, target: &str) -> &Self {
        self.lock().index_mirrors.push((key(trigger), key(target)));
        self
    }

    /// Every `for_vlan` call fails with `error`, like a v3 client that
    /// cannot select a context.
    pub fn refuse_vlan_scope(&self, error: Error) -> &Self {
        self.lock().scope_refusal = Some(error);
        self
    }

    /// Requests served so far (GET, walk and SET each count once).
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    /// Every varbind written, in order.
    pub fn sets(&self) -> Vec<(String, SnmpValue)> {
        self.lock().sets.clone()
    }

    pub fn value(&self, oid: &str) -> Option<SnmpValue> {
        self.lock().tables.get(&self.vlan).and_then(|t| t.get(&key(oid)).cloned())
    }

    fn begin(&self, oid: &[u32]) -> Result<MutexGuard<'_, AgentState>> {
        let mut state = self.lock();
        state.calls += 1;
        if let Some((_, err)) = state.failures.iter().find(|(branch, _)| oid.starts_with(branch)) {
            return Err(err.clone());
        }
        Ok(state)
    }
}

#[async_trait]
impl SnmpTransport for MemoryAgent {
    async fn get(&mut self, oid: &str) -> Result<Option<SnmpValue>> {
        let k = key(oid);
        let state = self.begin(&k)?;
        Ok(state.tables.get(&self.vlan).and_then(|t| t.get(&k).cloned()))
    }

    async fn walk(&mut self, branch: &str) -> Result<Vec<(String, SnmpValue)>> {
        let k = key(branch);
        let state = self.begin(&k)?;
        let Some(table) = state.tables.get(&self.vlan) else {
            return Ok(Vec::new());
        };
        Ok(table
            .range(k.clone()..)
            .take_while(|(oid, _)| oid.starts_with(&k))
            .filter(|(oid, _)| oid.len() > k.len())
            .map(|(oid, value)| (render(oid), value.clone()))
            .collect())
    }

    async fn set(&mut self, varbinds: &[(String, SnmpValue)]) -> Result<()> {
        let mut state = self.lock();
        state.calls += 1;
        for (oid, _) in varbinds {
            let k = key(oid);
            if let Some((_, err)) = state.failures.iter().find(|(branch, _)| k.starts_with(branch)) {
                return Err(err.clone());
            }
        }
        for (oid, value) in varbinds {
            let k = key(oid);
            let mut mirrored: Vec<(Vec<u32>, SnmpValue)> = state
                .set_mirrors
                .iter()
                .filter(|(trigger, _, _)| k.starts_with(trigger) && k.len() > trigger.len())
                .map(|(trigger, target, v)| {
                    let mut at = target.clone();
                    at.extend_from_slice(&k[trigger.len()..]);
                    (at, v.clone())
                })
                .collect();
            for (trigger, target) in &state.index_mirrors {
                if k.starts_with(trigger) && k.len() == trigger.len() + 1 {
                    let row = k[trigger.len()];
                    let mut at = target.clone();
                    at.push(row);
                    mirrored.push((at, SnmpValue::Integer(row as i64)));
                }
            }
            let table = state.tables.entry(self.vlan).or_default();
            table.insert(k, value.clone());
            for (at, v) in mirrored {
                table.insert(at, v);
            }
            state.sets.push((normalize_oid(oid).to_string(), value.clone()));
        }
        Ok(())
    }

    async fn for_vlan(&self, vlan_id: u16) -> Result<Box<dyn SnmpTransport>> {
        if let Some(err) = &self.lock().scope_refusal {
            return Err(err.clone());
        }
        Ok(Box::new(MemoryAgent {
            state: Arc::clone(&self.state),
            vlan: Some(vlan_id),
        }))
    }
}

/// CLI transport answering from a command -> output script.
#[derive(Clone, Default)]
pub struct ScriptedShell {
    replies: Arc<Mutex<HashMap<String, Result<String>>>>,
    history: Arc<Mutex<Vec<String>>>,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, command: &str, output: &str) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.insert(command.to_string(), Ok(output.to_string()));
        }
        self
    }

    pub fn fail(self, command: &str, error: Error) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.insert(command.to_string(), Err(error));
        }
        self
    }

    /// Commands received, in order.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CommandTransport for ScriptedShell {
    async fn run(&mut self, command: &str) -> Result<String> {
        if let Ok(mut history) = self.history.lock() {
            history.push(command.to_string());
        }
        let replies = self
            .replies
            .lock()
            .map_err(|_| Error::protocol("Scripted shell poisoned"))?;
        match replies.get(command.trim()) {
            Some(reply) => reply.clone(),
            None => Err(Error::protocol(format!("Invalid command: {}", command.trim()))
                .with_details("% Invalid input detected")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_walk_stays_in_branch_and_is_ordered() {
        let mut agent = MemoryAgent::new();
        agent
            .insert("1.3.6.1.2.1.2.2.1.2.10", SnmpValue::string("ten"))
            .insert("1.3.6.1.2.1.2.2.1.2.2", SnmpValue::string("two"))
            .insert("1.3.6.1.2.1.2.2.1.20.1", SnmpValue::Integer(0))
            .insert("1.3.6.1.2.1.2.2.1.3.1", SnmpValue::Integer(6));

        let rows = agent.walk("1.3.6.1.2.1.2.2.1.2").await.unwrap();
        let oids: Vec<&str> = rows.iter().map(|(o, _)| o.as_str()).collect();
        assert_eq!(oids, vec!["1.3.6.1.2.1.2.2.1.2.2", "1.3.6.1.2.1.2.2.1.2.10"]);
        assert_eq!(agent.call_count(), 1);
    }

    #[tokio::test]
    async fn test_set_records_and_mirrors() {
        let mut agent = MemoryAgent::new();
        agent.mirror_set("1.3.6.1.4.1.9.9.96.1.1.1.1.14", "1.3.6.1.4.1.9.9.96.1.1.1.1.10", SnmpValue::Integer(3));
        agent
            .set(&[("1.3.6.1.4.1.9.9.96.1.1.1.1.14.77".to_string(), SnmpValue::Integer(4))])
            .await
            .unwrap();
        assert_eq!(
            agent.get("1.3.6.1.4.1.9.9.96.1.1.1.1.10.77").await.unwrap(),
            Some(SnmpValue::Integer(3))
        );
        assert_eq!(agent.sets().len(), 1);
    }

    #[tokio::test]
    async fn test_vlan_scope_and_failures() {
        let agent = MemoryAgent::new();
        agent.insert_vlan(20, "1.3.6.1.2.1.17.1.4.1.2.1", SnmpValue::Integer(10101));
        agent.fail_on("1.3.6.1.2.1.47", Error::timeout("no answer"));

        let mut scoped = agent.for_vlan(20).await.unwrap();
        assert_eq!(scoped.walk("1.3.6.1.2.1.17.1.4.1.2").await.unwrap().len(), 1);

        let mut default_ctx = agent.clone();
        assert!(default_ctx.walk("1.3.6.1.2.1.17.1.4.1.2").await.unwrap().is_empty());
        let err = default_ctx.walk("1.3.6.1.2.1.47.1.1.1.1.2").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConnectTimeout);
    }

    #[tokio::test]
    async fn test_scripted_shell() {
        let mut shell = ScriptedShell::new().reply("show version", "Cisco IOS");
        tokio_test::assert_ok!(shell.run("show version").await);
        let err = shell.run("show bogus").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtocolError);
        assert_eq!(shell.history(), vec!["show version", "show bogus"]);
    }
}
