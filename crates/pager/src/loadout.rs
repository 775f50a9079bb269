//! File-backed stand-in for a host: the controls and build categories of one actor.

use crate::favorites::ActorId;
use crate::host::{
    AbilityDef, BuildCategory, Control, ControlDescriptor, ExtensionAbility, HostCapabilities,
};
use crate::item::{Icon, IconName};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::rc::Rc;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

const DEFAULT_LOADOUT: &str = include_str!("default_loadout.toml");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum CommandKind {
    #[default]
    Plain,
    Ability,
    Extension,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSpec {
    pub label: String,
    pub kind: CommandKind,
    pub def_name: Option<String>,
    pub category: Option<String>,
    pub trees: Vec<String>,
    pub description: Option<String>,
    pub icon: Option<IconName>,
    pub order: i32,
    pub hidden: bool,
    /// Present when the command is disabled.
    pub disabled_reason: Option<String>,
    pub exec: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySpec {
    pub label: String,
    pub description: String,
    pub order: i32,
    pub designators: Vec<CommandSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub actor: ActorId,
    #[serde(default)]
    pub extension_loaded: bool,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
    #[serde(default)]
    pub build_categories: Vec<CategorySpec>,
}

#[derive(Error, Debug)]
pub enum LoadoutError {
    #[error("Loadout not found at {0}")]
    NotFound(PathBuf),
    #[error("Loadout error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Loadout {
    pub fn load(path: &Path) -> Result<Self, LoadoutError> {
        if !path.exists() {
            return Err(LoadoutError::NotFound(path.to_path_buf()));
        }
        let s = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    /// Loads `path`, falling back to the bundled demo loadout when it is absent.
    pub fn load_or_demo(path: &Path) -> Result<Self, LoadoutError> {
        match Self::load(path) {
            Err(LoadoutError::NotFound(_)) => {
                log::info!("No loadout at {}, using the demo loadout", path.display());
                Self::demo()
            }
            other => other,
        }
    }

    pub fn demo() -> Result<Self, LoadoutError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_LOADOUT,
                config::FileFormat::Toml,
            ))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    pub fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            extension_loaded: self.extension_loaded,
        }
    }

    pub fn controls(&self) -> Vec<Rc<dyn Control>> {
        self.commands
            .iter()
            .filter(|c| !c.hidden)
            .map(|c| Rc::new(LoadoutCommand::new(c.clone())) as Rc<dyn Control>)
            .collect()
    }

    pub fn categories(&self) -> Vec<Rc<dyn BuildCategory>> {
        self.build_categories
            .iter()
            .map(|c| Rc::new(LoadoutCategory::new(c)) as Rc<dyn BuildCategory>)
            .collect()
    }
}

/// A loadout command acting as a host control. Running it spawns its `exec` line.
#[derive(Debug, Clone)]
pub struct LoadoutCommand {
    spec: CommandSpec,
}

impl LoadoutCommand {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }
}

impl Control for LoadoutCommand {
    fn label(&self) -> String {
        self.spec.label.clone()
    }

    fn description(&self) -> String {
        self.spec.description.clone().unwrap_or_default()
    }

    fn icon(&self) -> Option<Icon> {
        self.spec.icon.clone().map(Icon::Named)
    }

    fn order(&self) -> i32 {
        self.spec.order
    }

    fn is_visible(&self) -> bool {
        !self.spec.hidden
    }

    fn is_disabled(&self) -> bool {
        self.spec.disabled_reason.is_some()
    }

    fn disabled_reason(&self) -> Option<String> {
        self.spec.disabled_reason.clone()
    }

    fn descriptor(&self) -> ControlDescriptor {
        let spec = &self.spec;
        match spec.kind {
            CommandKind::Plain => ControlDescriptor::Plain,
            CommandKind::Ability => ControlDescriptor::Ability(AbilityDef {
                def_name: spec.def_name.clone(),
                category: spec.category.clone(),
                description: spec.description.clone(),
            }),
            CommandKind::Extension => ControlDescriptor::Extension(ExtensionAbility {
                def_name: spec.def_name.clone(),
                description: spec.description.clone(),
                trees: spec.trees.clone(),
            }),
        }
    }

    fn execute(&self) {
        let Some(exec) = self.spec.exec.as_deref().filter(|e| !e.is_empty()) else {
            log::info!("'{}' has nothing to run", self.spec.label);
            return;
        };
        let spawned = Command::new("sh")
            .arg("-c")
            .arg(exec)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            log::error!("Failed to run '{}': {}", exec, e);
        }
    }
}

pub struct LoadoutCategory {
    label: String,
    description: String,
    order: i32,
    designators: Vec<Rc<dyn Control>>,
}

impl LoadoutCategory {
    pub fn new(spec: &CategorySpec) -> Self {
        Self {
            label: spec.label.clone(),
            description: spec.description.clone(),
            order: spec.order,
            designators: spec
                .designators
                .iter()
                .map(|d| Rc::new(LoadoutCommand::new(d.clone())) as Rc<dyn Control>)
                .collect(),
        }
    }
}

impl BuildCategory for LoadoutCategory {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn designators(&self) -> Vec<Rc<dyn Control>> {
        self.designators.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_command_kind_deserialization() {
        let cases = vec![
            ("\"ability\"", CommandKind::Ability),
            ("\"Ability\"", CommandKind::Ability),
            ("\"EXTENSION\"", CommandKind::Extension),
            ("\"plain\"", CommandKind::Plain),
        ];
        for (json, expected) in cases {
            let deserialized: CommandKind = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_demo_loadout_parses() {
        let loadout = Loadout::demo().unwrap();
        assert_eq!(loadout.actor, ActorId::from("pawn-1"));
        assert!(loadout.capabilities().extension_loaded);
        assert_eq!(loadout.controls().len(), loadout.commands.len());
        assert_eq!(loadout.categories().len(), 2);
    }

    #[test]
    fn test_command_descriptors() {
        let heal = LoadoutCommand::new(CommandSpec {
            label: "Heal".to_string(),
            kind: CommandKind::Ability,
            def_name: Some("Heal".to_string()),
            disabled_reason: Some("Needs mana".to_string()),
            ..CommandSpec::default()
        });
        assert!(heal.is_disabled());
        assert_eq!(heal.disabled_reason().as_deref(), Some("Needs mana"));
        assert_eq!(
            heal.descriptor(),
            ControlDescriptor::Ability(AbilityDef {
                def_name: Some("Heal".to_string()),
                category: None,
                description: None,
            })
        );

        let plain = LoadoutCommand::new(CommandSpec {
            label: "Draft".to_string(),
            ..CommandSpec::default()
        });
        assert_eq!(plain.descriptor(), ControlDescriptor::Plain);
        assert!(!plain.is_disabled());
        plain.execute();
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loadout.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "actor = \"hero\"\n\n[[commands]]\nlabel = \"Blink\"\nkind = \"extension\"\ntrees = [\"Arcane\"]\n\n[[commands]]\nlabel = \"Secret\"\nhidden = true"
        )
        .unwrap();

        let loadout = Loadout::load(&path).unwrap();
        assert_eq!(loadout.actor.as_str(), "hero");
        assert!(!loadout.extension_loaded);
        assert_eq!(loadout.commands[0].kind, CommandKind::Extension);
        assert_eq!(loadout.commands[0].trees, vec!["Arcane"]);
        assert_eq!(loadout.controls().len(), 1);
    }

    #[test]
    fn test_missing_loadout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(Loadout::load(&path), Err(LoadoutError::NotFound(_))));
        assert!(Loadout::load_or_demo(&path).is_ok());
    }
}
