use crate::domain::WorldBounds;
use std::{env, net::IpAddr, str::FromStr, time::Duration};

// Runtime/server constants (not gameplay tuning).

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub fn http_port() -> u16 {
    env_or("ARENA_SERVER_PORT", 3001)
}

pub fn bind_addr() -> IpAddr {
    env_or("ARENA_BIND_ADDR", IpAddr::from([127, 0, 0, 1]))
}

/// How long an empty room is kept before its world task is stopped.
pub fn room_idle_grace() -> Duration {
    Duration::from_millis(env_or("ROOM_IDLE_GRACE_MS", 10_000))
}

pub fn world_bounds() -> WorldBounds {
    let default = WorldBounds::default();
    let width: f32 = env_or("WORLD_WIDTH", default.width);
    let height: f32 = env_or("WORLD_HEIGHT", default.height);
    if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
        WorldBounds { width, height }
    } else {
        tracing::warn!(width, height, "ignoring invalid world size");
        default
    }
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_variable_is_missing_or_garbage_then_default_is_used() {
        assert_eq!(env_or("ARENA_TEST_SURELY_UNSET_VAR", 7u16), 7);
        assert_eq!(env_or::<u64>("PATH", 42), 42);
    }
}
