//! Round-robin endpoint selection.

use std::sync::Mutex;

/// Selection strategy over a mutable endpoint set.
pub trait Balancer: Send + Sync {
    /// Returns the next endpoint, or the empty string when none are
    /// registered.
    fn next(&self) -> String;

    /// Appends an endpoint. Empty endpoints are ignored.
    fn add_server(&self, endpoint: &str);

    /// Removes the first matching endpoint.
    fn remove_server(&self, endpoint: &str);
}

#[derive(Debug, Default)]
struct State {
    servers: Vec<String>,
    index: usize,
}

/// Round-robin [`Balancer`]: a cursor advances over the endpoint list, one
/// step per `next` call, wrapping at the end.
#[derive(Debug, Default)]
pub struct RoundRobin {
    state: Mutex<State>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Balancer for RoundRobin {
    fn next(&self) -> String {
        let mut state = lock(&self.state);
        if state.servers.is_empty() {
            return String::new();
        }
        let server = state.servers[state.index].clone();
        state.index = (state.index + 1) % state.servers.len();
        server
    }

    fn add_server(&self, endpoint: &str) {
        if endpoint.is_empty() {
            return;
        }
        lock(&self.state).servers.push(endpoint.to_string());
    }

    fn remove_server(&self, endpoint: &str) {
        let mut state = lock(&self.state);
        if let Some(pos) = state.servers.iter().position(|s| s == endpoint) {
            state.servers.remove(pos);
            // Keep the cursor valid: wrap to the front when removal leaves it
            // past the end.
            if state.index >= state.servers.len() {
                state.index = 0;
            }
        }
    }
}

fn lock(state: &Mutex<State>) -> std::sync::MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Wraps a [`Balancer`] to select container endpoints for work.
pub struct EndpointBalancer {
    lb: Box<dyn Balancer>,
}

impl EndpointBalancer {
    pub fn new(lb: Box<dyn Balancer>) -> Self {
        Self { lb }
    }

    /// Returns the next container endpoint to use.
    pub fn next(&self) -> String {
        self.lb.next()
    }

    /// Registers a container endpoint with the balancer.
    pub fn add(&self, endpoint: &str) {
        if endpoint.is_empty() {
            return;
        }
        self.lb.add_server(endpoint);
    }

    /// Deregisters a container endpoint from the balancer.
    pub fn remove(&self, endpoint: &str) {
        if endpoint.is_empty() {
            return;
        }
        self.lb.remove_server(endpoint);
    }
}

impl Default for EndpointBalancer {
    fn default() -> Self {
        Self::new(Box::new(RoundRobin::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_on_empty_returns_empty_string() {
        let rr = RoundRobin::new();
        assert_eq!(rr.next(), "");
    }

    #[test]
    fn round_robin_is_fair() {
        let rr = RoundRobin::new();
        rr.add_server("a:1");
        rr.add_server("b:1");
        rr.add_server("c:1");

        let picks: Vec<String> = (0..10).map(|_| rr.next()).collect();
        assert_eq!(
            picks,
            vec!["a:1", "b:1", "c:1", "a:1", "b:1", "c:1", "a:1", "b:1", "c:1", "a:1"]
        );
    }

    #[test]
    fn add_server_ignores_empty_endpoints() {
        let rr = RoundRobin::new();
        rr.add_server("");
        assert_eq!(rr.next(), "");
    }

    #[test]
    fn remove_clamps_cursor() {
        let rr = RoundRobin::new();
        rr.add_server("a:1");
        rr.add_server("b:1");

        // Advance the cursor to the last slot, then remove that slot.
        assert_eq!(rr.next(), "a:1");
        rr.remove_server("b:1");

        assert_eq!(rr.next(), "a:1");
        assert_eq!(rr.next(), "a:1");
    }

    #[test]
    fn remove_drops_only_first_match() {
        let rr = RoundRobin::new();
        rr.add_server("a:1");
        rr.add_server("a:1");
        rr.remove_server("a:1");

        assert_eq!(rr.next(), "a:1");
    }

    #[test]
    fn endpoint_balancer_skips_empty_endpoints() {
        let balancer = EndpointBalancer::default();
        balancer.add("");
        balancer.add("a:1");
        assert_eq!(balancer.next(), "a:1");

        balancer.remove("a:1");
        assert_eq!(balancer.next(), "");
    }
}
