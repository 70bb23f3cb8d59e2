use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use log::info;

use crate::{
    data::{
        characters::{CombatStats, xp_required_for_level},
        items::Item,
    },
    map::{
        GameMap,
        room::{Direction, Occupant, OccupantKind, Room},
    },
};

const PICKUP_ORDER: [OccupantKind; 3] = [
    OccupantKind::Key,
    OccupantKind::Weapon,
    OccupantKind::Armor,
];

/// The explorer walking the generated map.
#[derive(Clone, Debug)]
pub struct Player {
    pub current_room: Point,
    pub inventory: Vec<Item>,
    pub stats: CombatStats,
    pub level: i32,
    pub xp: u32,
}

impl Player {
    pub fn new(current_room: Point) -> Self {
        Self {
            current_room,
            inventory: Vec::new(),
            stats: CombatStats {
                max_hp: 100,
                hp: 100,
                attack: 10,
                defense: 10,
                accuracy: 45,
                evasion: 35,
            },
            level: 1,
            xp: 0,
        }
    }

    /// Stands a new player in the start room, if the map has one.
    pub fn spawn(map: &GameMap) -> Option<Self> {
        map.player_start_room()
            .map(|room| Self::new(room.position()))
    }

    pub fn room<'m>(&self, map: &'m GameMap) -> Option<&'m Room> {
        map.room_at(self.current_room)
    }

    /// Follows an existing exit. `None` leaves the player where they are.
    pub fn travel(&mut self, map: &GameMap, direction: Direction) -> Option<Point> {
        let next = self.room(map)?.neighbor(direction)?;
        self.current_room = next;
        Some(next)
    }

    /// Takes the first carryable item in the room into the inventory.
    pub fn pick_up(&mut self, map: &mut GameMap) -> Option<Item> {
        let room = map.room_at_mut(self.current_room)?;
        let kind = PICKUP_ORDER
            .into_iter()
            .find(|kind| room.occupant(*kind).is_some())?;
        // Slots are keyed by kind, so only the three carryables come out here.
        let item = match room.take_occupant(kind)? {
            Occupant::Key(key) => Item::Key(key),
            Occupant::Weapon(weapon) => Item::Weapon(weapon),
            Occupant::Armor(armor) => Item::Armor(armor),
            Occupant::Lock(_) | Occupant::Enemy(_) | Occupant::Ally(_) => return None,
        };
        match &item {
            Item::Weapon(weapon) => {
                self.stats.attack += weapon.damage;
                self.stats.accuracy += weapon.accuracy;
            }
            Item::Armor(armor) => {
                self.stats.defense += armor.defense;
                self.stats.evasion += armor.evasion;
            }
            Item::Key(_) | Item::Lock(_) => {}
        }
        self.inventory.push(item.clone());
        Some(item)
    }

    pub fn can_open_lock(&self, map: &GameMap) -> bool {
        let Some(Occupant::Lock(lock)) = self
            .room(map)
            .and_then(|room| room.occupant(OccupantKind::Lock))
        else {
            return false;
        };
        self.inventory
            .iter()
            .any(|item| matches!(item, Item::Key(key) if key.opens(lock)))
    }

    /// Marks the enemy in the current room defeated and banks its reward.
    pub fn defeat_enemy(
        &mut self,
        map: &mut GameMap,
        rng: &mut RandomNumberGenerator,
    ) -> Option<u32> {
        let player_level = self.level;
        let enemy = map.room_at_mut(self.current_room)?.enemy_mut()?;
        if !enemy.is_active() {
            return None;
        }
        enemy.mark_defeated();
        let reward = enemy.xp_reward(player_level);
        self.gain_xp(reward, rng);
        Some(reward)
    }

    /// Adds experience and applies any level-ups. Returns levels gained.
    pub fn gain_xp(&mut self, amount: u32, rng: &mut RandomNumberGenerator) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= xp_required_for_level(self.level) {
            self.xp -= xp_required_for_level(self.level);
            self.level_up(rng);
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self, rng: &mut RandomNumberGenerator) {
        self.level += 1;
        let hp = 48 + rng.range(2, 13);
        self.stats.max_hp += hp;
        self.stats.hp += hp;
        self.stats.attack += 4 + rng.range(1, 4);
        self.stats.defense += 3 + rng.range(1, 3);
        self.stats.accuracy += rng.range(1, 3);
        self.stats.evasion += rng.range(1, 3);
        info!("player reached level {}", self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{
            ThemeBook,
            characters::Character,
            items::{Armor, KeyItem, LockItem, Weapon},
        },
        map::room::ClusterId,
    };

    fn corridor() -> GameMap {
        let mut map = GameMap::with_grid(3, 1).unwrap();
        map.add_room("cave", "Mouth", "", Point::new(0, 0), ClusterId(0))
            .unwrap();
        map.add_room("cave", "Gallery", "", Point::new(1, 0), ClusterId(0))
            .unwrap();
        map.add_room("cave", "Vault", "", Point::new(2, 0), ClusterId(0))
            .unwrap();
        assert!(map.connect(Point::new(0, 0), Point::new(1, 0), Direction::East));
        assert!(map.connect(Point::new(1, 0), Point::new(2, 0), Direction::East));
        map
    }

    #[test]
    fn travel_follows_exits_only() {
        let map = corridor();
        let mut player = Player::spawn(&map).unwrap();
        assert_eq!(player.current_room, Point::new(0, 0));
        assert_eq!(player.travel(&map, Direction::West), None);
        assert_eq!(player.travel(&map, Direction::East), Some(Point::new(1, 0)));
        assert_eq!(player.room(&map).unwrap().name(), "Gallery");
    }

    #[test]
    fn picking_up_a_weapon_boosts_attack() {
        let mut map = corridor();
        map.room_at_mut(Point::new(0, 0))
            .unwrap()
            .place_occupant(Occupant::Weapon(Weapon {
                name: "Mace".into(),
                damage: 9,
                accuracy: 3,
            }))
            .unwrap();
        let mut player = Player::spawn(&map).unwrap();
        let item = player.pick_up(&mut map).unwrap();
        assert_eq!(item.name(), "Mace");
        assert_eq!(player.stats.attack, 19);
        assert_eq!(player.stats.accuracy, 48);
        assert!(map.room_at(Point::new(0, 0)).unwrap().is_vacant());
        assert!(player.pick_up(&mut map).is_none());
    }

    #[test]
    fn locks_and_characters_stay_put() {
        let theme = ThemeBook::builtin().unwrap().genres.remove(0);
        let mut rng = RandomNumberGenerator::seeded(8);
        let mut map = corridor();
        let start = Point::new(0, 0);
        let room = map.room_at_mut(start).unwrap();
        room.place_occupant(Occupant::Lock(LockItem {
            name: "Iron Door".into(),
            opened_by: "Iron Key".into(),
        }))
        .unwrap();
        let enemy = Character::from_data(&theme.elements.enemies[0], true, 1, &mut rng);
        room.place_occupant(Occupant::Enemy(enemy)).unwrap();
        room.place_occupant(Occupant::Armor(Armor {
            name: "Chain Shirt".into(),
            defense: 5,
            evasion: 1,
        }))
        .unwrap();

        let mut player = Player::spawn(&map).unwrap();
        let item = player.pick_up(&mut map).unwrap();
        assert_eq!(item.name(), "Chain Shirt");
        assert_eq!(player.stats.defense, 15);
        assert!(player.pick_up(&mut map).is_none());
        let room = map.room_at(start).unwrap();
        assert!(room.occupant(OccupantKind::Lock).is_some());
        assert!(room.occupant(OccupantKind::Enemy).is_some());
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn key_opens_matching_lock() {
        let mut map = corridor();
        map.room_at_mut(Point::new(0, 0))
            .unwrap()
            .place_occupant(Occupant::Key(KeyItem {
                name: "Bone Key".into(),
                unlocks: "Ossuary Gate".into(),
            }))
            .unwrap();
        map.room_at_mut(Point::new(1, 0))
            .unwrap()
            .place_occupant(Occupant::Lock(LockItem {
                name: "Ossuary Gate".into(),
                opened_by: "Bone Key".into(),
            }))
            .unwrap();
        let mut player = Player::spawn(&map).unwrap();
        assert!(!player.can_open_lock(&map));
        player.pick_up(&mut map).unwrap();
        player.travel(&map, Direction::East).unwrap();
        assert!(player.can_open_lock(&map));
        assert!(player.pick_up(&mut map).is_none());
    }

    #[test]
    fn experience_levels_the_player() {
        let mut rng = RandomNumberGenerator::seeded(6);
        let mut player = Player::new(Point::new(0, 0));
        assert_eq!(player.gain_xp(249, &mut rng), 0);
        assert_eq!(player.gain_xp(1, &mut rng), 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 0);
        assert!((150..=160).contains(&player.stats.max_hp));
        assert!((15..=17).contains(&player.stats.attack));
    }

    #[test]
    fn defeating_the_placed_enemy() {
        let theme = ThemeBook::builtin().unwrap().genres.remove(0);
        let mut map =
            GameMap::generate_seeded(crate::config::GenerationConfig::default(), &theme, 3)
                .unwrap();
        let lair = map.find_occupant(OccupantKind::Enemy).unwrap().position();
        let mut rng = RandomNumberGenerator::seeded(3);
        let mut player = Player::spawn(&map).unwrap();
        player.current_room = lair;
        let reward = player.defeat_enemy(&mut map, &mut rng).unwrap();
        assert!(reward > 0);
        assert!(player.defeat_enemy(&mut map, &mut rng).is_none());
        let room = map.room_at(lair).unwrap();
        assert!(room.describe().contains("lies defeated"));
    }
}
