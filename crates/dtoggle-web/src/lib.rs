#![forbid(unsafe_code)]

//! `dtoggle-web` embeds the draggable toggle in a host page.
//!
//! Design goals:
//! - **Host-driven I/O**: the page pushes state maps, pointer samples, and
//!   clicks as [`HostEvent`]s, and applies what comes back.
//! - **Serialized processing**: every input goes through one FIFO queue, so
//!   a refresh never interleaves with half a gesture.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! ```rust,ignore
//! let mut host = ToggleHost::from_config_json(r#"{"entity": "lock.door"}"#, sink)?;
//! host.push_json(r#"{"kind": "states", "states": {...}}"#)?;
//! host.pump();
//! if let Ok(view) = host.render() { /* draw */ }
//! ```

#[cfg(feature = "input-parser")]
pub mod input_parser;

use std::collections::VecDeque;

use dtoggle_core::logging::TARGET_HOST;
use dtoggle_core::{
    CommandSink, HitTarget, PointerInput, StateSnapshot, ThumbGeometry, ToggleConfig, ToggleError,
};
use dtoggle_widgets::{
    DragToggle, ListenerCommand, ListenerRegistry, ToggleDispatch, ToggleLogEntry, ToggleView,
};
use web_time::Instant;

#[cfg(feature = "input-parser")]
pub use input_parser::{InputParseError, parse_host_message};

/// Pointer lifecycle phase of a host pointer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One input pushed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Full entity state map from the home-automation system.
    States(StateSnapshot),
    Pointer {
        phase: PointerPhase,
        /// Element under the pointer on press.
        target: HitTarget,
        input: PointerInput,
        /// Thumb/track measurement, required on press.
        geometry: Option<ThumbGeometry>,
    },
    Click {
        target: HitTarget,
    },
    /// The thumb or track element went away.
    GeometryLost,
    /// The card was attached to the page.
    Connect,
    /// The card was removed from the page.
    Disconnect,
}

/// What the host must apply after a [`ToggleHost::pump`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostOutputs {
    /// Listener changes, in order.
    pub listener_commands: Vec<ListenerCommand>,
    /// Log entry of every processed event.
    pub logs: Vec<ToggleLogEntry>,
    /// Number of service calls handed to the sink.
    pub commands_issued: usize,
}

/// Queue-driven host for one toggle card.
#[derive(Debug)]
pub struct ToggleHost<S> {
    toggle: DragToggle,
    sink: S,
    queue: VecDeque<HostEvent>,
    outputs: HostOutputs,
}

impl<S: CommandSink> ToggleHost<S> {
    /// Create a host with its own listener registry.
    #[must_use]
    pub fn new(config: ToggleConfig, sink: S) -> Self {
        Self::with_registry(config, ListenerRegistry::new(), sink)
    }

    /// Create a host sharing `registry` with other cards on the same window.
    #[must_use]
    pub fn with_registry(config: ToggleConfig, registry: ListenerRegistry, sink: S) -> Self {
        Self {
            toggle: DragToggle::new(config, registry),
            sink,
            queue: VecDeque::new(),
            outputs: HostOutputs::default(),
        }
    }

    /// Create a host from the JSON card configuration.
    pub fn from_config_json(json: &str, sink: S) -> Result<Self, ToggleError> {
        let config = ToggleConfig::from_json_str(json).inspect_err(|err| {
            tracing::error!(target: TARGET_HOST, error = %err, "card setup failed");
        })?;
        Ok(Self::new(config, sink))
    }

    /// Queue one event.
    pub fn push(&mut self, event: HostEvent) {
        self.queue.push_back(event);
    }

    /// Parse and queue one JSON message. Returns whether an event was queued.
    #[cfg(feature = "input-parser")]
    pub fn push_json(&mut self, json: &str) -> Result<bool, InputParseError> {
        match parse_host_message(json) {
            Ok(Some(event)) => {
                self.push(event);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => {
                tracing::warn!(target: TARGET_HOST, error = %err, "host message dropped");
                Err(err)
            }
        }
    }

    /// Events waiting to be processed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Process every queued event in order. Returns how many were processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.queue.pop_front() {
            let dispatch = self.handle(event, Instant::now());
            self.apply(dispatch);
            processed += 1;
        }
        if processed > 0 {
            tracing::trace!(target: TARGET_HOST, processed, "host queue drained");
        }
        processed
    }

    /// Current view. `Err(Unavailable)` means render nothing.
    pub fn render(&self) -> Result<ToggleView, ToggleError> {
        self.toggle.view().ok_or(ToggleError::Unavailable)
    }

    #[must_use]
    pub const fn toggle(&self) -> &DragToggle {
        &self.toggle
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub const fn outputs(&self) -> &HostOutputs {
        &self.outputs
    }

    /// Take accumulated outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> HostOutputs {
        std::mem::take(&mut self.outputs)
    }

    fn handle(&mut self, event: HostEvent, now: Instant) -> ToggleDispatch {
        match event {
            HostEvent::States(states) => self.toggle.refresh(&states),
            HostEvent::Pointer {
                phase,
                target,
                input,
                geometry,
            } => match phase {
                PointerPhase::Down => self.toggle.pointer_down(target, input, geometry, now),
                PointerPhase::Move => self.toggle.pointer_move(input),
                PointerPhase::Up => self.toggle.pointer_up(input, now),
                PointerPhase::Cancel => self.toggle.cancel(now),
            },
            HostEvent::Click { target } => self.toggle.click(target),
            HostEvent::GeometryLost => self.toggle.invalidate_geometry(),
            HostEvent::Connect => self.toggle.connect(),
            HostEvent::Disconnect => self.toggle.disconnect(now),
        }
    }

    fn apply(&mut self, dispatch: ToggleDispatch) {
        if let Some(call) = &dispatch.service_call {
            tracing::debug!(
                target: TARGET_HOST,
                service = %call.qualified_name(),
                entity = %call.entity_id,
                "service call issued"
            );
            self.sink.call_service(call);
            self.outputs.commands_issued += 1;
        }
        if let Some(command) = dispatch.listener_command {
            self.outputs.listener_commands.push(command);
        }
        self.outputs.logs.push(dispatch.log);
    }
}
