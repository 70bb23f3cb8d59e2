use crate::data::{ArmorData, PuzzleItemData, WeaponData};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyItem {
    pub name: String,
    pub unlocks: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockItem {
    pub name: String,
    pub opened_by: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Weapon {
    pub name: String,
    pub damage: i32,
    pub accuracy: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Armor {
    pub name: String,
    pub defense: i32,
    pub evasion: i32,
}

/// Anything that can sit in an inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Key(KeyItem),
    Lock(LockItem),
    Weapon(Weapon),
    Armor(Armor),
}

impl KeyItem {
    pub fn from_puzzle(data: &PuzzleItemData) -> Self {
        Self {
            name: data.key_item.clone(),
            unlocks: data.lock_item.clone(),
        }
    }

    pub fn opens(&self, lock: &LockItem) -> bool {
        self.unlocks == lock.name && lock.opened_by == self.name
    }
}

impl LockItem {
    pub fn from_puzzle(data: &PuzzleItemData) -> Self {
        Self {
            name: data.lock_item.clone(),
            opened_by: data.key_item.clone(),
        }
    }
}

impl From<&WeaponData> for Weapon {
    fn from(data: &WeaponData) -> Self {
        Self {
            name: data.name.clone(),
            damage: data.stats.damage,
            accuracy: data.stats.accuracy,
        }
    }
}

impl From<&ArmorData> for Armor {
    fn from(data: &ArmorData) -> Self {
        Self {
            name: data.name.clone(),
            defense: data.stats.defense,
            evasion: data.stats.evasion,
        }
    }
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Key(key) => &key.name,
            Item::Lock(lock) => &lock.name,
            Item::Weapon(weapon) => &weapon.name,
            Item::Armor(armor) => &armor.name,
        }
    }

    pub fn details(&self) -> String {
        match self {
            Item::Key(key) => format!("This key can unlock the {}.", key.unlocks),
            Item::Lock(lock) => format!("This lock can be opened with the {}.", lock.opened_by),
            Item::Weapon(weapon) => {
                format!("This weapon can cause {} points of damage.", weapon.damage)
            }
            Item::Armor(armor) => format!(
                "This armor can defend against {} points of damage.",
                armor.defense
            ),
        }
    }
}
