//! Administrative commands for the effect scheduler.
//!
//! Commands are queued from any context through a bounded queue guarded by
//! critical sections and applied by the render task between frames, so they
//! never interleave with a tick or a draw.

use alloc::vec::Vec;
use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Duration;
use heapless::Deque;

use crate::color::Rgb;
use crate::error::AdminError;
use crate::manager::EffectManager;
use crate::surface::Surface;

/// One administrative request, mapped 1:1 onto an [`EffectManager`] operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    EnableEffect(usize),
    DisableEffect(usize),
    SelectEffect(usize),
    NextEffect,
    PreviousEffect,
    /// Zero disables rotation
    SetInterval(Duration),
    PlayAll(bool),
    ShowVu(bool),
    SetGlobalColor(Rgb),
    ClearGlobalColor,
    /// Replace the catalog from a persisted document
    ReloadCatalog(Vec<u8>),
}

impl AdminCommand {
    /// Apply the command to `manager`
    pub fn apply<S: Surface, const CHANNELS: usize>(
        self,
        manager: &mut EffectManager<S, CHANNELS>,
    ) -> Result<(), AdminError> {
        match self {
            Self::EnableEffect(index) => manager.enable(index)?,
            Self::DisableEffect(index) => manager.disable(index)?,
            Self::SelectEffect(index) => manager.select_effect(index)?,
            Self::NextEffect => manager.next_effect(),
            Self::PreviousEffect => manager.previous_effect(),
            Self::SetInterval(interval) => manager.set_rotation_interval(interval),
            Self::PlayAll(play_all) => manager.set_play_all(play_all),
            Self::ShowVu(show) => {
                manager.show_vu(show);
            }
            Self::SetGlobalColor(color) => manager.set_global_color_override(color)?,
            Self::ClearGlobalColor => manager.clear_global_color_override(),
            Self::ReloadCatalog(document) => manager.load_catalog_from_config(&document)?,
        }
        Ok(())
    }
}

/// Error returned when the queue is full; carries the rejected command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFull(pub AdminCommand);

/// Bounded queue of pending administrative commands
pub struct AdminQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<AdminCommand, SIZE>>>,
}

impl<const SIZE: usize> Default for AdminQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> AdminQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for the web, telnet or remote side
    pub const fn sender(&self) -> AdminSender<'_, SIZE> {
        AdminSender { queue: self }
    }

    /// Handle for the render task
    pub const fn receiver(&self) -> AdminReceiver<'_, SIZE> {
        AdminReceiver { queue: self }
    }

    pub fn try_send(&self, command: AdminCommand) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(QueueFull)
        })
    }

    /// Take the oldest pending command, if any
    pub fn try_receive(&self) -> Option<AdminCommand> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }
}

#[derive(Clone, Copy)]
pub struct AdminSender<'a, const SIZE: usize> {
    queue: &'a AdminQueue<SIZE>,
}

impl<const SIZE: usize> AdminSender<'_, SIZE> {
    pub fn try_send(&self, command: AdminCommand) -> Result<(), QueueFull> {
        self.queue.try_send(command)
    }
}

#[derive(Clone, Copy)]
pub struct AdminReceiver<'a, const SIZE: usize> {
    queue: &'a AdminQueue<SIZE>,
}

impl<const SIZE: usize> AdminReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<AdminCommand> {
        self.queue.try_receive()
    }

    /// Apply every pending command to `manager`, returning how many were
    /// applied successfully. Failed commands are logged and dropped.
    pub fn process_pending<S: Surface, const CHANNELS: usize>(
        &self,
        manager: &mut EffectManager<S, CHANNELS>,
    ) -> usize {
        let mut applied = 0;
        while let Some(command) = self.try_receive() {
            log::debug!("admin command {:?}", command);
            match command.apply(manager) {
                Ok(()) => applied += 1,
                Err(error) => log::warn!("admin command failed: {}", error),
            }
        }
        applied
    }
}
