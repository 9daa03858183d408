//! Глобальное состояние игры: Menu / Playing / Paused
//!
//! Core держит машину состояний, фронтенд рассылает [`GameStateChanged`]
//! своим слушателям (UI, музыка) через обычный event-канал.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Paused,
}

/// Состояние сменилось
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChanged {
    pub state: GameState,
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct GameStateManager {
    pub current: GameState,
    pub previous: GameState,
}

impl GameStateManager {
    /// Безусловный переход; вызывающий публикует возвращённое событие
    pub fn change_state(&mut self, new_state: GameState) -> GameStateChanged {
        self.previous = self.current;
        self.current = new_state;
        GameStateChanged { state: new_state }
    }

    pub fn start_game(&mut self) -> GameStateChanged {
        self.change_state(GameState::Playing)
    }

    pub fn return_to_menu(&mut self) -> GameStateChanged {
        self.change_state(GameState::Menu)
    }

    /// Пауза валидна только из Playing
    pub fn pause(&mut self) -> Option<GameStateChanged> {
        (self.current == GameState::Playing).then(|| self.change_state(GameState::Paused))
    }

    /// Снятие паузы валидно только из Paused
    pub fn resume(&mut self) -> Option<GameStateChanged> {
        (self.current == GameState::Paused).then(|| self.change_state(GameState::Playing))
    }

    pub fn is_playing(&self) -> bool {
        self.current == GameState::Playing
    }
}
