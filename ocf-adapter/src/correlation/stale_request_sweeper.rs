/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Periodic eviction of fire-once requests that never received a response.

use crate::correlation::request::RequestKind;
use crate::correlation::request_registry::RequestRegistry;
use crate::observability::{events, fields};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const COMPONENT: &str = "stale_request_sweeper";

/// Drops GET, DELETE, POST and PUT entries whose age exceeds the response timeout.
///
/// Evicted continuations are never invoked. Observe entries are left alone.
pub(crate) struct StaleRequestSweeper {
    registry: Arc<RequestRegistry>,
    response_timeout: Duration,
}

impl StaleRequestSweeper {
    pub(crate) fn new(registry: Arc<RequestRegistry>, response_timeout: Duration) -> Self {
        Self {
            registry,
            response_timeout,
        }
    }

    /// Runs one pass over every fire-once queue and returns how many entries were evicted.
    pub(crate) async fn sweep(&self, now: Instant) -> usize {
        let mut evicted = 0;
        for kind in RequestKind::FIRE_ONCE {
            evicted += self
                .registry
                .for_each_expired(kind, now, self.response_timeout, |request| {
                    warn!(
                        event = events::REQUEST_EVICTED,
                        component = COMPONENT,
                        kind = kind.as_str(),
                        request_id = request.id(),
                        endpoint = %fields::format_endpoint(request.endpoint()),
                        uri = request.uri(),
                        age_ms = fields::format_duration_ms(request.age(now)),
                        reason = fields::REASON_RESPONSE_TIMEOUT,
                        "evicting request without response"
                    );
                })
                .await;
        }

        if evicted > 0 {
            debug!(
                event = events::SWEEP_SUMMARY,
                component = COMPONENT,
                evicted,
                "sweep pass complete"
            );
        }
        evicted
    }

    /// Moves the sweeper onto its own task, ticking every `sweep_interval`. The first pass
    /// happens one interval after spawning.
    pub(crate) fn spawn(self, sweep_interval: Duration) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        info!(
            event = events::SWEEPER_START,
            component = COMPONENT,
            interval_ms = fields::format_duration_ms(sweep_interval),
            timeout_ms = fields::format_duration_ms(self.response_timeout),
            "starting stale request sweeper"
        );

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + sweep_interval, sweep_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    tick = ticker.tick() => {
                        self.sweep(tick).await;
                    }
                }
            }
        });

        SweeperHandle { shutdown_tx, task }
    }
}

/// Owner of a running sweeper task.
pub(crate) struct SweeperHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the task and waits for it to finish. No sweep runs after this returns.
    pub(crate) async fn stop(self) {
        // The task may already be gone; the join below reports that.
        let _ = self.shutdown_tx.send(());

        match self.task.await {
            Ok(()) => info!(
                event = events::SWEEPER_STOP,
                component = COMPONENT,
                "stopped stale request sweeper"
            ),
            Err(err) => warn!(
                event = events::SWEEPER_STOP_FAILED,
                component = COMPONENT,
                err = %err,
                "stale request sweeper ended abnormally"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StaleRequestSweeper;
    use crate::constants::StatusCode;
    use crate::correlation::request::{RequestKind, RequestOptions};
    use crate::correlation::request_factory::RequestFactory;
    use crate::correlation::request_registry::RequestRegistry;
    use crate::correlation::response_dispatcher::ResponseDispatcher;
    use crate::endpoint::Endpoint;
    use crate::message::{OcfResponse, ResponseHandler};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{advance, sleep, Instant};

    const TIMEOUT: Duration = Duration::from_millis(2000);

    async fn issue(
        factory: &RequestFactory,
        registry: &RequestRegistry,
        kind: RequestKind,
        handler: Option<ResponseHandler>,
    ) -> u64 {
        let endpoint = Endpoint::new("fan", "coap://10.0.0.9:5683");
        let request = factory
            .create(kind, &endpoint, "/fan/speed", RequestOptions::default(), handler)
            .expect("valid request");
        let id = request.id();
        registry.insert(Arc::new(request)).await;
        id
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_stale_fire_once_entries_without_calling_them() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let sweeper = StaleRequestSweeper::new(registry.clone(), TIMEOUT);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handler: ResponseHandler = Arc::new(move |_: &OcfResponse| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for kind in RequestKind::ALL {
            issue(&factory, &registry, kind, Some(handler.clone())).await;
        }
        advance(Duration::from_millis(2001)).await;

        assert_eq!(sweeper.sweep(Instant::now()).await, 4);

        for kind in RequestKind::FIRE_ONCE {
            assert_eq!(registry.len(kind).await, 0);
        }
        assert_eq!(registry.len(RequestKind::Observe).await, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_keeps_fresh_entries() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let sweeper = StaleRequestSweeper::new(registry.clone(), TIMEOUT);

        let stale = issue(&factory, &registry, RequestKind::Get, None).await;
        advance(Duration::from_millis(1500)).await;
        let fresh = issue(&factory, &registry, RequestKind::Get, None).await;
        advance(Duration::from_millis(600)).await;

        assert_eq!(sweeper.sweep(Instant::now()).await, 1);
        let remaining = registry.ids(RequestKind::Get).await;
        assert!(!remaining.contains(&stale));
        assert_eq!(remaining, vec![fresh]);
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_sweeper_evicts_on_the_tick_after_the_timeout() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        issue(&factory, &registry, RequestKind::Put, None).await;

        let handle = StaleRequestSweeper::new(registry.clone(), TIMEOUT).spawn(TIMEOUT);

        // First tick at 2000ms sees an age of exactly the timeout and keeps the entry.
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(registry.len(RequestKind::Put).await, 1);

        // Second tick at 4000ms evicts it.
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(registry.len(RequestKind::Put).await, 0);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_sweeper_no_longer_evicts() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        issue(&factory, &registry, RequestKind::Delete, None).await;

        let handle = StaleRequestSweeper::new(registry.clone(), TIMEOUT).spawn(TIMEOUT);
        handle.stop().await;

        sleep(Duration::from_secs(10)).await;
        assert_eq!(registry.len(RequestKind::Delete).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_claimed_by_exactly_one_of_sweep_and_dispatch() {
        for dispatch_first in [false, true] {
            let factory = RequestFactory::new();
            let registry = Arc::new(RequestRegistry::new());
            let sweeper = Arc::new(StaleRequestSweeper::new(registry.clone(), TIMEOUT));
            let dispatcher = Arc::new(ResponseDispatcher::new(RequestKind::Get, registry.clone()));
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = calls.clone();
            let handler: ResponseHandler = Arc::new(move |_: &OcfResponse| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

            let id = issue(&factory, &registry, RequestKind::Get, Some(handler)).await;
            advance(Duration::from_millis(2001)).await;

            let now = Instant::now();
            let response = OcfResponse::new(
                Endpoint::new("fan", "coap://10.0.0.9:5683"),
                "/fan/speed",
                StatusCode::Ok,
            );
            let sweep = {
                let sweeper = sweeper.clone();
                async move { sweeper.sweep(now).await }
            };
            let dispatch = {
                let dispatcher = dispatcher.clone();
                async move { dispatcher.dispatch(id, response).await }
            };
            let (sweep, dispatch) = if dispatch_first {
                let dispatch = tokio::spawn(dispatch);
                (tokio::spawn(sweep), dispatch)
            } else {
                let sweep = tokio::spawn(sweep);
                (sweep, tokio::spawn(dispatch))
            };
            let evicted = sweep.await.expect("sweep task should not panic");
            let dispatched = dispatch.await.expect("dispatch task should not panic");

            assert_eq!(evicted + usize::from(dispatched), 1);
            assert_eq!(calls.load(Ordering::SeqCst), usize::from(dispatched));
            assert_eq!(registry.len(RequestKind::Get).await, 0);
        }
    }
}
