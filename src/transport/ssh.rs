use async_trait::async_trait;
use std::io::Read;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::CommandTransport;
use crate::error::{Error, Result};
use crate::models::SshProfile;
use crate::settings::ConnectorSettings;

/// Keyboard-interactive prompt handler that always responds with the password
struct PasswordPrompt {
    password: String,
}

impl ssh2::KeyboardInteractivePrompt for PasswordPrompt {
    fn prompt<'a>(
        &mut self,
        _username: &str,
        _instructions: &str,
        prompts: &[ssh2::Prompt<'a>],
    ) -> Vec<String> {
        prompts.iter().map(|_| self.password.clone()).collect()
    }
}

/// Blocking libssh2 client. Every command opens its own session, the way
/// Netmiko's send_command does for one-shot use.
pub struct SshClient {
    host: String,
    port: u16,
    username: String,
    password: String,
    timeout: Duration,
    cancel: CancellationToken,
}

impl SshClient {
    pub fn new(host: &str, profile: &SshProfile, settings: &ConnectorSettings) -> Self {
        Self {
            host: host.to_string(),
            port: profile.port,
            username: profile.username.clone(),
            password: profile.password.clone(),
            timeout: settings.ssh_timeout,
            cancel: settings.cancel.clone(),
        }
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| Error::timeout(format!("Cannot resolve {}", host)).with_details(e.to_string()))?
        .next()
        .ok_or_else(|| Error::timeout(format!("No address for {}", host)))
}

/// Create an SSH session and authenticate with password, then
/// keyboard-interactive. Blocking; call from a spawn_blocking context.
fn ssh_connect(host: &str, port: u16, user: &str, pass: &str, timeout: Duration) -> Result<ssh2::Session> {
    let addr = resolve(host, port)?;
    let tcp = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|e| Error::timeout(format!("SSH connection to {} failed", addr)).with_details(e.to_string()))?;
    tcp.set_read_timeout(Some(timeout)).ok();
    tcp.set_write_timeout(Some(timeout)).ok();

    let mut session = ssh2::Session::new()
        .map_err(|e| Error::protocol("Failed to create SSH session").with_details(e.to_string()))?;
    session.set_tcp_stream(tcp);
    session.set_timeout(timeout.as_millis().min(u32::MAX as u128) as u32);
    session
        .handshake()
        .map_err(|e| Error::protocol(format!("SSH handshake with {} failed", host)).with_details(e.to_string()))?;

    if session.userauth_password(user, pass).is_ok() && session.authenticated() {
        return Ok(session);
    }

    // Arista EOS and similar only offer keyboard-interactive
    let mut prompter = PasswordPrompt { password: pass.to_string() };
    let _ = session.userauth_keyboard_interactive(user, &mut prompter);

    if session.authenticated() {
        Ok(session)
    } else {
        Err(Error::auth(format!("SSH authentication to {} failed", host))
            .with_details("all methods exhausted"))
    }
}

fn ssh_run_command(host: &str, port: u16, user: &str, pass: &str, command: &str, timeout: Duration) -> Result<String> {
    let session = ssh_connect(host, port, user, pass, timeout)?;
    let io_err = |what: &str, e: &dyn std::fmt::Display| Error::protocol(format!("SSH {} failed", what)).with_details(e.to_string());

    let mut channel = session.channel_session().map_err(|e| io_err("channel open", &e))?;
    channel.exec(command).map_err(|e| io_err("exec", &e))?;

    let mut output = String::new();
    channel.read_to_string(&mut output).map_err(|e| io_err("read", &e))?;
    channel.wait_close().map_err(|e| io_err("close", &e))?;

    let trimmed = output.trim_start();
    if trimmed.starts_with('%') || trimmed.contains("Invalid input") || trimmed.starts_with("error:") {
        return Err(Error::protocol(format!("Command rejected: {}", command)).with_details(output.trim().to_string()));
    }
    Ok(output)
}

#[async_trait]
impl CommandTransport for SshClient {
    async fn run(&mut self, command: &str) -> Result<String> {
        let host = self.host.clone();
        let port = self.port;
        let user = self.username.clone();
        let pass = self.password.clone();
        let cmd = command.to_string();
        let timeout = self.timeout;

        let task = tokio::task::spawn_blocking(move || ssh_run_command(&host, port, &user, &pass, &cmd, timeout));
        tokio::select! {
            _ = self.cancel.cancelled() => Err(Error::cancelled()),
            joined = task => joined.map_err(|e| Error::protocol("SSH task failed").with_details(e.to_string()))?,
        }
    }
}
