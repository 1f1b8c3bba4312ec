use crate::message::Message;
use cosmic::{
    iced::keyboard::{Key, key::Named},
    widget::menu::{
        Action,
        key_bind::{KeyBind, Modifier},
    },
};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    OpenFolder,
    ToggleSelectAll,
    DeleteSelected,
    Escape,
}

impl MenuAction {
    pub fn message(self) -> Message {
        match self {
            MenuAction::OpenFolder => Message::OpenFolderDialog,
            MenuAction::ToggleSelectAll => Message::ToggleSelectAll,
            MenuAction::DeleteSelected => Message::DeleteSelected,
            MenuAction::Escape => Message::Escape,
        }
    }
}

impl Action for MenuAction {
    type Message = Message;

    fn message(&self) -> Message {
        (*self).message()
    }
}

pub fn init_key_binds() -> HashMap<KeyBind, MenuAction> {
    let mut binds = HashMap::new();

    binds.insert(
        KeyBind {
            modifiers: vec![Modifier::Ctrl],
            key: Key::Character("o".into()),
        },
        MenuAction::OpenFolder,
    );

    // Selection
    binds.insert(
        KeyBind {
            modifiers: vec![Modifier::Ctrl],
            key: Key::Character("a".into()),
        },
        MenuAction::ToggleSelectAll,
    );

    binds.insert(
        KeyBind {
            modifiers: vec![],
            key: Key::Named(Named::Delete),
        },
        MenuAction::DeleteSelected,
    );

    binds.insert(
        KeyBind {
            modifiers: vec![],
            key: Key::Named(Named::Escape),
        },
        MenuAction::Escape,
    );

    binds
}
