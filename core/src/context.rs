// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::time::{self, DateTime};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Context provides the capabilities a generator reads while generating.
///
/// Generators never own a clock or a random source. Every `generate_*` call reads
/// them from the context passed in, which lets tests freeze time and nonces.
///
/// ## Example
///
/// ```
/// use presign_core::{Context, FixedClock, StaticNonce};
///
/// let ctx = Context::new()
///     .with_clock(FixedClock::new("2024-01-02T03:04:05Z".parse().unwrap()))
///     .with_nonce(StaticNonce::new("0123456789abcdef0123456789abcdef"));
/// ```
#[derive(Clone)]
pub struct Context {
    env: Arc<dyn Env>,
    clock: Arc<dyn Clock>,
    nonce: Arc<dyn GenerateNonce>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("env", &self.env)
            .field("clock", &self.clock)
            .field("nonce", &self.nonce)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context.
    ///
    /// The environment is a no-op, the clock reads system time and nonces come from
    /// random UUIDs.
    pub fn new() -> Self {
        Self {
            env: Arc::new(NoopEnv),
            clock: Arc::new(SystemClock),
            nonce: Arc::new(UuidNonce),
        }
    }

    /// Replace the environment implementation.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Replace the clock implementation.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the nonce implementation.
    pub fn with_nonce(mut self, nonce: impl GenerateNonce) -> Self {
        self.nonce = Arc::new(nonce);
        self
    }

    /// Get the environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Read current time.
    #[inline]
    pub fn now(&self) -> DateTime {
        self.clock.now()
    }

    /// Draw a fresh nonce.
    #[inline]
    pub fn nonce(&self) -> String {
        self.nonce.nonce()
    }
}

/// Permits parameterizing environment access.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    fn var(&self, key: &str) -> Option<String>;
}

/// Implements Env for the OS context.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }
}

/// StaticEnv provides a static env environment.
///
/// This is useful for testing or for providing a fixed environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The environment variables to use.
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }
}

/// NoopEnv is a no-op implementation that always returns None.
///
/// This is used when no environment is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Clock is the source of "now" for signatures and expirations.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Read current time.
    fn now(&self) -> DateTime;
}

/// SystemClock reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        time::now()
    }
}

/// FixedClock always returns the same instant.
///
/// We should always take current time to sign requests.
/// Only use this for testing.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime);

impl FixedClock {
    /// Create a clock frozen at `t`.
    pub fn new(t: DateTime) -> Self {
        Self(t)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime {
        self.0
    }
}

/// GenerateNonce draws one-time tokens used by nonce based signing modes.
pub trait GenerateNonce: Debug + Send + Sync + 'static {
    /// Draw a nonce.
    fn nonce(&self) -> String;
}

/// UuidNonce returns a random v4 UUID without separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNonce;

impl GenerateNonce for UuidNonce {
    fn nonce(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// StaticNonce always returns the same token.
///
/// Only use this for testing.
#[derive(Debug, Clone)]
pub struct StaticNonce(String);

impl StaticNonce {
    /// Create a nonce source that always returns `nonce`.
    pub fn new(nonce: impl Into<String>) -> Self {
        Self(nonce.into())
    }
}

impl GenerateNonce for StaticNonce {
    fn nonce(&self) -> String {
        self.0.clone()
    }
}
