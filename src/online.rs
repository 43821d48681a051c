// One side of a networked game. Each peer runs its own engine; they stay identical by exchanging
// every state-changing action together with its sequence number.

use log::{info, warn};

use crate::error::{SetupError, SyncError};
use crate::event::PeerEvent;
use crate::game::{GameEngine, PlayerAction};
use crate::player::Player;
use crate::rules::Rules;
use crate::starter::PiecePositions;


fn replay(
    rules: Rules, positions: PiecePositions, actions: &[PlayerAction],
) -> Result<GameEngine, SyncError> {
    let mut engine = GameEngine::from_positions(rules, positions)?;
    for (seq, &action) in actions.iter().enumerate() {
        // Invalid actions may legitimately be part of the log when they consume the budget.
        let _ = engine.apply_action(action);
        if engine.actions_applied() as usize != seq + 1 {
            return Err(SyncError::Desync {
                expected: seq as u32 + 1,
                received: engine.actions_applied(),
            });
        }
    }
    Ok(engine)
}


#[derive(Clone, Debug)]
pub struct OnlineGame {
    engine: GameEngine,
    local_player: Player,
    // Set by `resync_request`. A `Resync` is only accepted while this is set.
    awaiting_resync: bool,
}

impl OnlineGame {
    // Creates the game on the hosting side. The returned event must be sent to the peer.
    pub fn host(rules: Rules, local_player: Player) -> Result<(Self, PeerEvent), SetupError> {
        let engine = GameEngine::new(rules)?;
        let setup = PeerEvent::BoardSetup {
            rules: engine.rules().clone(),
            positions: engine.starting_positions().clone(),
        };
        Ok((OnlineGame { engine, local_player, awaiting_resync: false }, setup))
    }

    pub fn join(setup: PeerEvent, local_player: Player) -> Result<Self, SyncError> {
        match setup {
            PeerEvent::BoardSetup { rules, positions } => {
                let engine = GameEngine::from_positions(rules, positions)?;
                Ok(OnlineGame { engine, local_player, awaiting_resync: false })
            }
            PeerEvent::Resync { rules, positions, actions } => {
                let engine = replay(rules, positions, &actions)?;
                Ok(OnlineGame { engine, local_player, awaiting_resync: false })
            }
            PeerEvent::Action { .. } | PeerEvent::ResyncRequest { .. } => {
                Err(SyncError::UnexpectedSetup)
            }
        }
    }

    pub fn engine(&self) -> &GameEngine { &self.engine }
    pub fn local_player(&self) -> Player { self.local_player }

    // Applies a local action and returns the event to send to the peer. An invalid action that
    // still consumed part of the budget must be sent too, so it also yields an event.
    pub fn make_local_action(&mut self, action: PlayerAction) -> Result<PeerEvent, SyncError> {
        if action.player != self.local_player {
            return Err(SyncError::ForeignPlayer);
        }
        let seq = self.engine.actions_applied();
        let result = self.engine.apply_action(action).map(|_| ());
        match result {
            Ok(()) => {}
            Err(err) if self.engine.actions_applied() == seq => return Err(SyncError::Action(err)),
            Err(err) => warn!("Invalid local action consumed the budget: {err}"),
        }
        Ok(PeerEvent::Action { seq, action })
    }

    // Processes an event from the peer. Returns an event to send back, if any.
    pub fn receive(&mut self, event: PeerEvent) -> Result<Option<PeerEvent>, SyncError> {
        match event {
            PeerEvent::BoardSetup { rules, positions } => {
                if self.engine.actions_applied() != 0 {
                    return Err(SyncError::UnexpectedSetup);
                }
                info!("Peer proposed a new board setup");
                self.engine = GameEngine::from_positions(rules, positions)?;
                Ok(None)
            }
            PeerEvent::Action { seq, action } => {
                if action.player == self.local_player {
                    return Err(SyncError::ForeignPlayer);
                }
                let expected = self.engine.actions_applied();
                if seq != expected {
                    warn!("Desync: expected action #{expected}, received #{seq}");
                    return Err(SyncError::Desync { expected, received: seq });
                }
                let result = self.engine.apply_action(action).map(|_| ());
                match result {
                    Ok(()) => Ok(None),
                    Err(_) if self.engine.actions_applied() == expected + 1 => Ok(None),
                    Err(err) => Err(SyncError::Action(err)),
                }
            }
            PeerEvent::ResyncRequest { known_seq } => {
                info!("Peer at action #{known_seq} requested a resync");
                Ok(Some(PeerEvent::Resync {
                    rules: self.engine.rules().clone(),
                    positions: self.engine.starting_positions().clone(),
                    actions: self.engine.action_log().to_vec(),
                }))
            }
            PeerEvent::Resync { rules, positions, actions } => {
                if !self.awaiting_resync {
                    warn!("Ignoring a resync that was not requested");
                    return Err(SyncError::UnexpectedSetup);
                }
                self.engine = replay(rules, positions, &actions)?;
                self.awaiting_resync = false;
                info!("Resynchronized at action #{}", self.engine.actions_applied());
                Ok(None)
            }
        }
    }

    pub fn resync_request(&mut self) -> PeerEvent {
        self.awaiting_resync = true;
        PeerEvent::ResyncRequest { known_seq: self.engine.actions_applied() }
    }
}
