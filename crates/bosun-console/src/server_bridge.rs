use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
/// Interface boundary to the game-server supervisor: liveness and console
/// command relay. Process spawning and screen/tmux plumbing live behind the
/// implementation.
pub trait ServerBridge: Send + Sync {
    async fn is_up(&self, server: &str) -> bool;

    async fn send_command(&self, server: &str, command: &str) -> Result<()>;
}
