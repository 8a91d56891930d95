//! Battle history: battles with the fleets that fought in them.

use crate::arena::SlotId;
use crate::compare::{KeyComparator, KeyOrder};
use crate::config::{BattleMerge, Config};
use crate::error::{CoreError, CoreResult};
use crate::flags::{FleetStatus, StatusOp};
use crate::list::{DoublyList, Position};
use crate::persist::{read_text, write_replacing};
use linkreg_codec::{
    decode_history, is_valid_fleet_field, is_valid_text_field, BattleBlock, FleetLine,
};
use std::cmp::Ordering;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Status text written for a fleet whose bits were changed to zero.
pub const EMPTY_STATUS_TEXT: &str = "None";

/// A fleet as recorded in one battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    name: String,
    reserved: String,
    total_ships: u16,
    status: FleetStatus,
    status_text: String,
}

impl Fleet {
    /// Creates a fleet; the status text is derived from `status`.
    pub fn new(name: impl Into<String>, total_ships: u16, status: FleetStatus) -> Self {
        Self {
            name: name.into(),
            reserved: String::new(),
            total_ships,
            status,
            status_text: render_status(status),
        }
    }

    fn from_line(line: FleetLine) -> Self {
        Self {
            status: FleetStatus::from_status_text(&line.status_text),
            name: line.name,
            reserved: line.reserved,
            total_ships: line.total_ships,
            status_text: line.status_text,
        }
    }

    /// Returns the fleet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of ships.
    #[must_use]
    pub fn total_ships(&self) -> u16 {
        self.total_ships
    }

    /// Returns the status bits.
    #[must_use]
    pub fn status(&self) -> FleetStatus {
        self.status
    }

    /// Returns the status text as loaded, or as rewritten after a change.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    fn apply(&mut self, op: StatusOp, mask: FleetStatus) {
        let status = FleetStatus::from_bits_retain(op.apply(self.status.bits(), mask.bits()));
        if status != self.status {
            self.status = status;
            self.status_text = render_status(status);
        }
    }

    fn to_line(&self) -> FleetLine {
        FleetLine::new(&self.name, &self.reserved, self.total_ships, &self.status_text)
    }
}

fn render_status(status: FleetStatus) -> String {
    let text = status.to_status_text();
    if text.is_empty() {
        EMPTY_STATUS_TEXT.to_owned()
    } else {
        text
    }
}

/// Only named bits are written out as status text.
fn check_named(status: FleetStatus) -> CoreResult<()> {
    if FleetStatus::all().contains(status) {
        Ok(())
    } else {
        Err(CoreError::invalid_argument(format!(
            "unnamed fleet status bits: {:#x}",
            status.bits() & !FleetStatus::all().bits()
        )))
    }
}

/// One battle and its fleets in the order they were recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    name: String,
    date: u32,
    fleets: Vec<Fleet>,
}

impl Battle {
    /// Returns the battle name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the date, conventionally `YYYYMMDD`.
    #[must_use]
    pub fn date(&self) -> u32 {
        self.date
    }

    /// Returns the fleets.
    #[must_use]
    pub fn fleets(&self) -> &[Fleet] {
        &self.fleets
    }

    fn to_block(&self) -> BattleBlock {
        let mut block = BattleBlock::new(&self.name, self.date);
        block.fleets = self.fleets.iter().map(Fleet::to_line).collect();
        block
    }
}

/// Handle to a battle in a [`GalaxyHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BattleHandle(SlotId);

/// Battles ordered by name, then date.
#[derive(Debug, Clone, Default)]
pub struct GalaxyHistory {
    battles: DoublyList<Battle>,
    order: KeyOrder,
    merge: BattleMerge,
}

impl GalaxyHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            battles: DoublyList::new(),
            order: config.battle_order,
            merge: config.battle_merge,
        }
    }

    /// Loads a history file into a new history.
    ///
    /// # Errors
    ///
    /// See [`GalaxyHistory::load`].
    pub fn open(path: &Path, config: &Config) -> CoreResult<Self> {
        let mut history = Self::new(config);
        history.load(path)?;
        Ok(history)
    }

    fn probe<'a>(&'a self, name: &'a str, date: u32) -> impl Fn(&Battle) -> Ordering + 'a {
        move |battle: &Battle| {
            self.order
                .compare(name, &battle.name)
                .then(date.cmp(&battle.date))
        }
    }

    /// Records a battle.
    ///
    /// A battle whose name and date match an existing one either extends it
    /// with `fleets` or is rejected, depending on [`BattleMerge`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a name that would not survive a save, a fleet
    /// name that would not, or a fleet status with unnamed bits;
    /// `DuplicateKey` for a repeat under [`BattleMerge::Reject`].
    pub fn add_battle(
        &mut self,
        name: &str,
        date: u32,
        fleets: impl IntoIterator<Item = Fleet>,
    ) -> CoreResult<BattleHandle> {
        if !is_valid_text_field(name) {
            return Err(CoreError::invalid_argument(format!(
                "invalid battle name: {name:?}"
            )));
        }
        let fleets: Vec<Fleet> = fleets.into_iter().collect();
        for fleet in &fleets {
            if !is_valid_fleet_field(&fleet.name) {
                return Err(CoreError::invalid_argument(format!(
                    "invalid fleet name: {:?}",
                    fleet.name
                )));
            }
            check_named(fleet.status)?;
        }
        match self.battles.locate(self.probe(name, date)) {
            Position::Occupied(id) => match self.merge {
                BattleMerge::Continue => {
                    self.battles.get_mut(id)?.fleets.extend(fleets);
                    Ok(BattleHandle(id))
                }
                BattleMerge::Reject => Err(CoreError::duplicate_key(format!("{name}@{date}"))),
            },
            Position::Vacant { after } => {
                let battle = Battle {
                    name: name.to_owned(),
                    date,
                    fleets,
                };
                self.battles.insert_after(after, battle).map(BattleHandle)
            }
        }
    }

    /// Returns the battle behind `handle`.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the battle was deleted.
    pub fn get(&self, handle: BattleHandle) -> CoreResult<&Battle> {
        self.battles.get(handle.0)
    }

    /// Iterates over battles carrying `name`, oldest first.
    pub fn battles_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Battle> + 'a {
        self.battles
            .iter()
            .filter(move |battle| self.order.equals(name, &battle.name))
    }

    /// Deletes the battle with this name and date, fleets included.
    ///
    /// # Errors
    ///
    /// `EmptyCollection` on an empty history, `NotFound` if absent.
    pub fn delete_battle(&mut self, name: &str, date: u32) -> CoreResult<Battle> {
        if self.battles.is_empty() {
            return Err(CoreError::EmptyCollection);
        }
        match self.battles.locate(self.probe(name, date)) {
            Position::Occupied(id) => self.battles.remove(id),
            Position::Vacant { .. } => Err(CoreError::not_found(format!("{name}@{date}"))),
        }
    }

    /// Drops every battle.
    pub fn clear(&mut self) {
        self.battles.clear();
    }

    /// Returns the number of battles.
    #[must_use]
    pub fn total_battles(&self) -> usize {
        self.battles.len()
    }

    /// Returns the number of fleets across all battles.
    #[must_use]
    pub fn total_fleets(&self) -> usize {
        self.battles.iter().map(|battle| battle.fleets.len()).sum()
    }

    /// Returns true if no battles are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    /// Iterates over battles in order; `.rev()` walks backwards.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Battle> + '_ {
        self.battles.iter()
    }

    /// Counts fleets with at least one bit of `mask` set.
    #[must_use]
    pub fn count_fleets_with_status_bits(&self, mask: FleetStatus) -> usize {
        self.battles
            .iter()
            .flat_map(|battle| &battle.fleets)
            .filter(|fleet| fleet.status.intersects(mask))
            .count()
    }

    /// Applies `op` with `mask` to every fleet of every battle named
    /// `battle_name` and returns how many fleets that covered.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `mask` carries bits with no status name;
    /// `NotFound` if no battle has this name.
    pub fn modify_fleet_statuses(
        &mut self,
        battle_name: &str,
        op: StatusOp,
        mask: FleetStatus,
    ) -> CoreResult<usize> {
        check_named(mask)?;
        let order = self.order;
        let mut matched = false;
        let mut modified = 0;
        for battle in self
            .battles
            .values_mut()
            .filter(|battle| order.equals(battle_name, &battle.name))
        {
            matched = true;
            for fleet in &mut battle.fleets {
                fleet.apply(op, mask);
                modified += 1;
            }
        }
        if !matched {
            return Err(CoreError::not_found(battle_name));
        }
        debug!(battle = battle_name, ?op, mask = mask.bits(), modified, "modified fleet statuses");
        Ok(modified)
    }

    /// Replaces the history with the contents of a history file.
    ///
    /// # Errors
    ///
    /// `FileNotFound` or `Io` if the file cannot be read; `FileCorrupted`
    /// for a grammar violation; `DuplicateKey` for a repeated battle under
    /// [`BattleMerge::Reject`]. The history is empty after any error.
    pub fn load(&mut self, path: &Path) -> CoreResult<usize> {
        self.clear();
        let input = read_text(path)?;
        let count = self.load_str(&input)?;
        info!(path = %path.display(), battles = count, fleets = self.total_fleets(), "loaded history");
        Ok(count)
    }

    /// Replaces the history with the contents of a history document and
    /// returns the number of battles.
    ///
    /// # Errors
    ///
    /// As [`GalaxyHistory::load`], minus file errors.
    pub fn load_str(&mut self, input: &str) -> CoreResult<usize> {
        self.clear();
        let result = self.fill(input);
        if let Err(err) = &result {
            warn!(error = %err, "history load failed, history cleared");
            self.clear();
        }
        result
    }

    fn fill(&mut self, input: &str) -> CoreResult<usize> {
        for block in decode_history(input)? {
            let fleets = block.fleets.into_iter().map(Fleet::from_line);
            self.add_battle(&block.name, block.date, fleets)?;
        }
        Ok(self.total_battles())
    }

    /// Writes every battle as a block, in history order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from `out`.
    pub fn write_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for battle in self.battles.iter() {
            writeln!(out, "{}", battle.to_block())?;
        }
        Ok(())
    }

    /// Saves the history to `path`, replacing the file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be written; the old file is then kept.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        write_replacing(path, |out| self.write_to(out))?;
        info!(path = %path.display(), battles = self.total_battles(), "saved history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HISTORY: &str = "\
BATTLE:Endor
DATE:19830525
FLEET:Rebel Fleet|x|30|Shield Active, Ready for Jump
FLEET:Imperial Navy|y|80|Critical Damage
BATTLE:Coruscant
DATE:19990519
FLEET:Home Guard|z|12|Withdrawal
BATTLE:endor
DATE:19830525
FLEET:Ewoks|w|3|holding the forest
";

    fn loaded() -> GalaxyHistory {
        let mut history = GalaxyHistory::new(&Config::default());
        history.load_str(HISTORY).unwrap();
        history
    }

    fn names(history: &GalaxyHistory) -> Vec<(&str, u32)> {
        history.iter().map(|b| (b.name(), b.date())).collect()
    }

    #[test]
    fn load_orders_and_merges() {
        let history = loaded();
        assert_eq!(
            names(&history),
            vec![("Coruscant", 19990519), ("Endor", 19830525)]
        );
        assert_eq!(history.total_battles(), 2);
        assert_eq!(history.total_fleets(), 4);

        let endor: Vec<_> = history.battles_named("ENDOR").collect();
        assert_eq!(endor.len(), 1);
        let fleets: Vec<_> = endor[0].fleets().iter().map(Fleet::name).collect();
        assert_eq!(fleets, vec!["Rebel Fleet", "Imperial Navy", "Ewoks"]);
    }

    #[test]
    fn reject_policy_fails_on_repeat() {
        let config = Config::new().battle_merge(BattleMerge::Reject);
        let mut history = GalaxyHistory::new(&config);

        let err = history.load_str(HISTORY).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateKey { .. }));
        assert!(history.is_empty());
    }

    #[test]
    fn same_name_different_dates_ordered_by_date() {
        let mut history = GalaxyHistory::new(&Config::default());
        history.add_battle("Hoth", 19800521, []).unwrap();
        history.add_battle("Hoth", 19800101, []).unwrap();
        history.add_battle("Bespin", 19800601, []).unwrap();

        assert_eq!(
            names(&history),
            vec![("Bespin", 19800601), ("Hoth", 19800101), ("Hoth", 19800521)]
        );
        let reversed: Vec<_> = history.iter().rev().map(Battle::date).collect();
        assert_eq!(reversed, vec![19800521, 19800101, 19800601]);
    }

    #[test]
    fn status_bits_from_text() {
        let history = loaded();
        let endor = history.battles_named("Endor").next().unwrap();
        assert_eq!(
            endor.fleets()[0].status(),
            FleetStatus::SHIELD_ACTIVE | FleetStatus::READY_FOR_JUMP
        );
        assert_eq!(endor.fleets()[2].status(), FleetStatus::empty());
    }

    #[test]
    fn count_with_any_bit() {
        let history = loaded();
        assert_eq!(history.count_fleets_with_status_bits(FleetStatus::SHIELD_ACTIVE), 1);
        assert_eq!(
            history.count_fleets_with_status_bits(
                FleetStatus::CRITICAL_DAMAGE | FleetStatus::WITHDRAWAL
            ),
            2
        );
        assert_eq!(history.count_fleets_with_status_bits(FleetStatus::empty()), 0);
    }

    #[test]
    fn modify_set_clear_toggle() {
        let mut history = loaded();

        let modified = history
            .modify_fleet_statuses("endor", StatusOp::Set, FleetStatus::WITHDRAWAL)
            .unwrap();
        assert_eq!(modified, 3);
        assert_eq!(history.count_fleets_with_status_bits(FleetStatus::WITHDRAWAL), 4);

        history
            .modify_fleet_statuses("Coruscant", StatusOp::Clear, FleetStatus::WITHDRAWAL)
            .unwrap();
        let coruscant = history.battles_named("Coruscant").next().unwrap();
        assert_eq!(coruscant.fleets()[0].status(), FleetStatus::empty());
        assert_eq!(coruscant.fleets()[0].status_text(), EMPTY_STATUS_TEXT);

        history
            .modify_fleet_statuses("Endor", StatusOp::Toggle, FleetStatus::SHIELD_ACTIVE)
            .unwrap();
        let endor = history.battles_named("Endor").next().unwrap();
        assert_eq!(
            endor.fleets()[0].status(),
            FleetStatus::READY_FOR_JUMP | FleetStatus::WITHDRAWAL
        );
        assert_eq!(endor.fleets()[0].status_text(), "Ready for Jump, Withdrawal");
        assert_eq!(
            endor.fleets()[1].status(),
            FleetStatus::SHIELD_ACTIVE | FleetStatus::CRITICAL_DAMAGE | FleetStatus::WITHDRAWAL
        );
    }

    #[test]
    fn modify_unknown_battle_is_not_found() {
        let mut history = loaded();
        let err = history
            .modify_fleet_statuses("Yavin", StatusOp::Set, FleetStatus::WITHDRAWAL)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_battle_by_name_and_date() {
        let mut history = loaded();
        assert!(history.delete_battle("Endor", 1).unwrap_err().is_not_found());

        let removed = history.delete_battle("endor", 19830525).unwrap();
        assert_eq!(removed.fleets().len(), 3);
        assert_eq!(names(&history), vec![("Coruscant", 19990519)]);

        history.clear();
        assert!(matches!(
            history.delete_battle("Coruscant", 19990519),
            Err(CoreError::EmptyCollection)
        ));
    }

    #[test]
    fn corrupt_history_leaves_it_empty() {
        let mut history = loaded();
        let err = history
            .load_str("BATTLE:Hoth\nFLEET:Rogue|r|12|Ready for Jump\n")
            .unwrap_err();
        assert!(matches!(err, CoreError::FileCorrupted(_)));
        assert!(history.is_empty());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.txt");

        let mut history = loaded();
        history
            .modify_fleet_statuses("Coruscant", StatusOp::Set, FleetStatus::SHIELD_ACTIVE)
            .unwrap();
        history.save(&path).unwrap();

        let reloaded = GalaxyHistory::open(&path, &Config::default()).unwrap();
        let before: Vec<_> = history.iter().cloned().collect();
        let after: Vec<_> = reloaded.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn unnamed_status_bits_are_rejected() {
        let mut history = loaded();
        let before = history.count_fleets_with_status_bits(FleetStatus::all());

        let err = history
            .modify_fleet_statuses("Endor", StatusOp::Set, FleetStatus::from_bits_retain(0x10))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));

        let mut saved = Vec::new();
        history.write_to(&mut saved).unwrap();
        let mut reloaded = GalaxyHistory::new(&Config::default());
        reloaded.load_str(&String::from_utf8(saved).unwrap()).unwrap();
        assert_eq!(reloaded.count_fleets_with_status_bits(FleetStatus::all()), before);

        let fleet = Fleet::new("Rogue", 1, FleetStatus::from_bits_retain(0x20));
        assert!(history.add_battle("Hoth", 1, [fleet]).is_err());
    }

    #[test]
    fn names_that_would_not_reload_are_rejected() {
        let mut history = GalaxyHistory::new(&Config::default());
        for name in ["", " Hoth", "Hoth ", "Hoth; IV", "Hoth\nIV"] {
            let err = history.add_battle(name, 1, []).unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument { .. }), "{name:?}");
        }
        for name in ["Red|Gold", "Red;Gold", " Red"] {
            let fleet = Fleet::new(name, 3, FleetStatus::empty());
            let err = history.add_battle("Endor", 1, [fleet]).unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument { .. }), "{name:?}");
        }
        assert!(history.is_empty());

        history
            .add_battle("Battle of Endor", 1, [Fleet::new("Red Squadron", 3, FleetStatus::empty())])
            .unwrap();
        let mut saved = Vec::new();
        history.write_to(&mut saved).unwrap();
        let mut reloaded = GalaxyHistory::new(&Config::default());
        reloaded.load_str(&String::from_utf8(saved).unwrap()).unwrap();
        let before: Vec<_> = history.iter().cloned().collect();
        let after: Vec<_> = reloaded.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn open_missing_file() {
        let dir = tempdir().unwrap();
        let err = GalaxyHistory::open(&dir.path().join("none.txt"), &Config::default()).unwrap_err();
        assert!(matches!(err, CoreError::FileNotFound { .. }));
    }
}
