//! A self-contained battle engine for tests and offline search
//!
//! [`LocalBattle`] implements the whole [`Simulator`] contract without an
//! external process: requests come out in the same JSON shape the real
//! simulator emits and choices go in through the same strings. The rules
//! are deliberately reduced. Damage is the standard level/power/stat
//! formula with type effectiveness and STAB, moves never miss, and status
//! moves resolve to nothing. That is enough to drive decision code end to
//! end and to act as a deterministic opponent in search rollouts, where
//! reproducibility matters more than mechanical completeness.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use rotom_battle::Type;
use rotom_protocol::{parse_choice, to_id, Action, GameType, MoveCategory, MoveTarget, Player};

use crate::simulator::{SavedBattle, Simulator};
use crate::SimError;

const STRUGGLE_POWER: u32 = 50;

/// Final stats for one team member; hp doubles as max HP
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpecStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

/// One move on a team sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSpec {
    pub name: String,
    pub move_type: String,
    pub category: String,
    pub base_power: u32,
    pub accuracy: Option<u32>,
    pub pp: u32,
    pub target: String,
}

impl MoveSpec {
    pub fn new(name: &str, move_type: &str, category: &str, base_power: u32) -> Self {
        Self {
            name: name.to_string(),
            move_type: move_type.to_string(),
            category: category.to_string(),
            base_power,
            accuracy: Some(100),
            pp: 16,
            target: "normal".to_string(),
        }
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    pub fn with_pp(mut self, pp: u32) -> Self {
        self.pp = pp;
        self
    }

    /// Normalized id, e.g. "Body Slam" -> "bodyslam"
    pub fn id(&self) -> String {
        to_id(&self.name)
    }

    fn struggle() -> Self {
        Self {
            name: "Struggle".to_string(),
            move_type: "Normal".to_string(),
            category: "Physical".to_string(),
            base_power: STRUGGLE_POWER,
            accuracy: None,
            pp: 1,
            target: "randomNormal".to_string(),
        }
    }
}

/// Everything the engine needs to field one Pokemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonSpec {
    pub species: String,
    pub level: u8,
    pub types: Vec<String>,
    pub stats: SpecStats,
    pub moves: Vec<MoveSpec>,
    pub ability: String,
    pub item: String,
    pub tera_type: Option<String>,
}

impl PokemonSpec {
    pub fn new(species: &str, level: u8, types: &[&str], stats: SpecStats) -> Self {
        Self {
            species: species.to_string(),
            level,
            types: types.iter().map(|t| t.to_string()).collect(),
            stats,
            moves: Vec::new(),
            ability: String::new(),
            item: String::new(),
            tera_type: None,
        }
    }

    pub fn with_moves(mut self, moves: Vec<MoveSpec>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_ability(mut self, ability: &str) -> Self {
        self.ability = ability.to_string();
        self
    }

    pub fn with_item(mut self, item: &str) -> Self {
        self.item = item.to_string();
        self
    }

    pub fn with_tera(mut self, tera_type: &str) -> Self {
        self.tera_type = Some(tera_type.to_string());
        self
    }
}

/// A named trainer and their roster, in team order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSpec {
    pub trainer: String,
    pub members: Vec<PokemonSpec>,
}

impl TeamSpec {
    pub fn new(trainer: &str, members: Vec<PokemonSpec>) -> Self {
        Self {
            trainer: trainer.to_string(),
            members,
        }
    }
}

/// A fielded team member with its live battle state
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Combatant {
    spec: PokemonSpec,
    hp: u32,
    pp: Vec<u32>,
    terastallized: bool,
}

impl Combatant {
    fn new(spec: PokemonSpec) -> Self {
        let hp = spec.stats.hp;
        let pp = spec.moves.iter().map(|m| m.pp).collect();
        Self {
            spec,
            hp,
            pp,
            terastallized: false,
        }
    }

    fn fainted(&self) -> bool {
        self.hp == 0
    }

    fn condition(&self) -> String {
        if self.fainted() {
            "0 fnt".to_string()
        } else {
            format!("{}/{}", self.hp, self.spec.stats.hp)
        }
    }

    fn ident(&self, player: Player) -> String {
        format!("{}: {}", player.as_str(), self.spec.species)
    }

    fn details(&self) -> String {
        format!("{}, L{}", self.spec.species, self.spec.level)
    }

    /// Defensive typing right now; terastallization overrides it entirely
    fn current_types(&self) -> Vec<Type> {
        if self.terastallized {
            if let Some(t) = self.spec.tera_type.as_deref().and_then(Type::from_name) {
                return vec![t];
            }
        }
        self.spec.types.iter().filter_map(|t| Type::from_name(t)).collect()
    }

    fn out_of_pp(&self) -> bool {
        self.pp.iter().all(|&p| p == 0)
    }
}

/// What a side owes the engine before the battle can step forward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Pending {
    /// Every occupied slot picks a move or switch
    Turn,
    /// Replace fainted actives; one flag per slot
    ForceSwitch(Vec<bool>),
    /// The opponent is choosing, nothing to do here
    Waiting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalSide {
    trainer: String,
    team: Vec<Combatant>,
    /// Team index per active slot; `None` is an emptied slot
    active: Vec<Option<usize>>,
    pending: Pending,
    /// The accepted-but-unresolved choice string for this side
    staged: Option<String>,
    tera_used: bool,
}

impl LocalSide {
    fn new(spec: TeamSpec, slots: usize) -> Self {
        let team: Vec<Combatant> = spec.members.into_iter().map(Combatant::new).collect();
        let active = (0..slots)
            .map(|i| if i < team.len() { Some(i) } else { None })
            .collect();
        Self {
            trainer: spec.trainer,
            team,
            active,
            pending: Pending::Turn,
            staged: None,
            tera_used: false,
        }
    }

    fn occupant(&self, slot: usize) -> Option<usize> {
        self.active.get(slot).copied().flatten()
    }

    fn is_benched(&self, idx: usize) -> bool {
        !self.active.contains(&Some(idx))
    }

    fn bench_available_excluding(&self, claimed: &[usize]) -> bool {
        self.team
            .iter()
            .enumerate()
            .any(|(i, c)| !c.fainted() && self.is_benched(i) && !claimed.contains(&i))
    }

    fn first_bench(&self) -> Option<usize> {
        self.team
            .iter()
            .enumerate()
            .find(|(i, c)| !c.fainted() && self.is_benched(*i))
            .map(|(i, _)| i)
    }

    fn all_fainted(&self) -> bool {
        self.team.iter().all(Combatant::fainted)
    }

    fn needs_decision(&self) -> bool {
        !matches!(self.pending, Pending::Waiting)
    }
}

/// One move execution waiting its turn in the speed order
struct QueuedMove {
    player: Player,
    slot: usize,
    pick: usize,
    target: Option<i8>,
    speed: u32,
}

/// Deterministic in-process battle engine
///
/// Two teams, singles or doubles, resolved with simultaneous choices the
/// same way the real simulator sequences them: switches first, then moves
/// in descending speed order with p1 winning ties. The entire state is
/// serde-serializable, which is what makes `export_state`/`import_state`
/// a pure data copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalBattle {
    game_type: GameType,
    turn: u32,
    rqid: u64,
    p1: LocalSide,
    p2: LocalSide,
    ended: bool,
    winner: Option<String>,
}

impl LocalBattle {
    /// Start a battle from two team sheets
    ///
    /// Leading members are sent out immediately; there is no team preview
    /// phase. Fails on an empty roster or a member with no moves.
    pub fn start(game_type: GameType, p1: TeamSpec, p2: TeamSpec) -> Result<Self, SimError> {
        for team in [&p1, &p2] {
            if team.members.is_empty() {
                return Err(SimError::InvalidSetup(format!(
                    "team for {} has no members",
                    team.trainer
                )));
            }
            if let Some(member) = team.members.iter().find(|m| m.moves.is_empty()) {
                return Err(SimError::InvalidSetup(format!(
                    "{} has no moves",
                    member.species
                )));
            }
        }

        let slots = game_type.active_slots();
        Ok(Self {
            game_type,
            turn: 1,
            rqid: 1,
            p1: LocalSide::new(p1, slots),
            p2: LocalSide::new(p2, slots),
            ended: false,
            winner: None,
        })
    }

    /// Current turn number; replacements after a knockout do not advance it
    pub fn turn(&self) -> u32 {
        self.turn
    }

    fn side(&self, player: Player) -> &LocalSide {
        match player {
            Player::P1 => &self.p1,
            Player::P2 => &self.p2,
        }
    }

    fn side_mut(&mut self, player: Player) -> &mut LocalSide {
        match player {
            Player::P1 => &mut self.p1,
            Player::P2 => &mut self.p2,
        }
    }

    fn move_entries(combatant: &Combatant) -> Vec<Value> {
        if combatant.out_of_pp() {
            let struggle = MoveSpec::struggle();
            return vec![json!({
                "move": struggle.name,
                "id": struggle.id(),
                "pp": 1,
                "maxpp": 1,
                "target": struggle.target,
                "disabled": false,
                "type": struggle.move_type,
                "basePower": struggle.base_power,
                "category": struggle.category,
            })];
        }

        combatant
            .spec
            .moves
            .iter()
            .zip(&combatant.pp)
            .map(|(m, &pp)| {
                json!({
                    "move": m.name,
                    "id": m.id(),
                    "pp": pp,
                    "maxpp": m.pp,
                    "target": m.target,
                    "disabled": pp == 0,
                    "type": m.move_type,
                    "basePower": m.base_power,
                    "category": m.category,
                    "accuracy": m.accuracy.map_or(json!(true), |a| json!(a)),
                })
            })
            .collect()
    }

    fn active_block(&self, player: Player) -> Value {
        let side = self.side(player);
        let slots: Vec<Value> = side
            .active
            .iter()
            .map(|slot| match slot {
                Some(idx) => {
                    let c = &side.team[*idx];
                    let mut entry = json!({ "moves": Self::move_entries(c) });
                    if !side.tera_used && !c.terastallized {
                        if let Some(t) = &c.spec.tera_type {
                            entry["canTerastallize"] = json!(t);
                        }
                    }
                    entry
                }
                // An emptied slot keeps its position so slot numbering
                // stays stable; no moves means the slot can only pass.
                None => json!({ "moves": [] }),
            })
            .collect();
        Value::Array(slots)
    }

    fn side_block(&self, player: Player) -> Value {
        let side = self.side(player);
        let pokemon: Vec<Value> = side
            .team
            .iter()
            .enumerate()
            .map(|(i, c)| {
                json!({
                    "ident": c.ident(player),
                    "details": c.details(),
                    "condition": c.condition(),
                    "active": side.active.contains(&Some(i)),
                    "stats": {
                        "atk": c.spec.stats.atk,
                        "def": c.spec.stats.def,
                        "spa": c.spec.stats.spa,
                        "spd": c.spec.stats.spd,
                        "spe": c.spec.stats.spe,
                    },
                    "moves": c.spec.moves.iter().map(MoveSpec::id).collect::<Vec<_>>(),
                    "baseAbility": to_id(&c.spec.ability),
                    "item": to_id(&c.spec.item),
                    "teraType": c.spec.tera_type,
                })
            })
            .collect();

        json!({
            "name": side.trainer,
            "id": player.as_str(),
            "pokemon": pokemon,
        })
    }

    fn build_request(&self, player: Player) -> Option<Value> {
        if self.ended {
            return None;
        }

        let mut req = match &self.side(player).pending {
            Pending::Waiting => json!({ "wait": true }),
            Pending::ForceSwitch(flags) => json!({
                "forceSwitch": flags,
                "noCancel": true,
            }),
            Pending::Turn => json!({ "active": self.active_block(player) }),
        };
        req["side"] = self.side_block(player);
        req["rqid"] = json!(self.rqid);
        Some(req)
    }

    fn check_switch_target(
        &self,
        player: Player,
        n: usize,
        claimed: &[usize],
    ) -> Result<usize, SimError> {
        let side = self.side(player);
        let invalid = |reason: String| SimError::InvalidChoice {
            side: player,
            reason,
        };

        if n == 0 || n > side.team.len() {
            return Err(invalid(format!("no team member in position {n}")));
        }
        let idx = n - 1;
        let target = &side.team[idx];
        if target.fainted() {
            return Err(invalid(format!("{} has fainted", target.spec.species)));
        }
        if !side.is_benched(idx) {
            return Err(invalid(format!("{} is already active", target.spec.species)));
        }
        if claimed.contains(&idx) {
            return Err(invalid(format!(
                "{} is already switching in",
                target.spec.species
            )));
        }
        Ok(idx)
    }

    fn validate(&self, player: Player, actions: &[Action]) -> Result<(), SimError> {
        let side = self.side(player);
        let invalid = |reason: String| SimError::InvalidChoice {
            side: player,
            reason,
        };

        // A lone "default" always stands for the whole side
        if let [Action::Default] = actions {
            return Ok(());
        }

        let slots = side.active.len();
        if actions.len() != slots {
            return Err(invalid(format!(
                "expected {slots} actions, got {}",
                actions.len()
            )));
        }

        let mut claimed: Vec<usize> = Vec::new();
        for (slot, action) in actions.iter().enumerate() {
            match &side.pending {
                Pending::Waiting => return Err(SimError::NoPendingDecision(player)),
                Pending::ForceSwitch(flags) => {
                    let forced = flags.get(slot).copied().unwrap_or(false);
                    match action {
                        Action::Switch(n) => {
                            if !forced {
                                return Err(invalid(format!("slot {} is not switching", slot + 1)));
                            }
                            let idx = self.check_switch_target(player, *n, &claimed)?;
                            claimed.push(idx);
                        }
                        Action::Pass | Action::Default => {
                            if forced && side.bench_available_excluding(&claimed) {
                                return Err(invalid(format!("slot {} must switch", slot + 1)));
                            }
                        }
                        Action::Move { .. } => {
                            return Err(invalid("cannot move during a forced switch".to_string()));
                        }
                    }
                }
                Pending::Turn => match action {
                    Action::Pass => {
                        if side.occupant(slot).is_some() {
                            return Err(invalid(format!(
                                "slot {} has a Pokemon and must act",
                                slot + 1
                            )));
                        }
                    }
                    Action::Default => {}
                    Action::Move { slot: pick, tera, target } => {
                        if let Some(t) = *target {
                            if t == 0 || t.unsigned_abs() as usize > slots {
                                return Err(invalid(format!("no target in position {t}")));
                            }
                        }
                        let idx = side
                            .occupant(slot)
                            .ok_or_else(|| invalid(format!("slot {} is empty", slot + 1)))?;
                        let c = &side.team[idx];
                        if c.out_of_pp() {
                            if *pick != 1 {
                                return Err(invalid("only struggle is available".to_string()));
                            }
                        } else {
                            if *pick == 0 || *pick > c.spec.moves.len() {
                                return Err(invalid(format!("no move in slot {pick}")));
                            }
                            if c.pp[pick - 1] == 0 {
                                return Err(invalid(format!(
                                    "{} is out of pp",
                                    c.spec.moves[pick - 1].name
                                )));
                            }
                        }
                        if *tera {
                            if side.tera_used {
                                return Err(invalid(
                                    "terastallization already used".to_string(),
                                ));
                            }
                            if c.spec.tera_type.is_none() {
                                return Err(invalid(format!(
                                    "{} has no tera type",
                                    c.spec.species
                                )));
                            }
                        }
                    }
                    Action::Switch(n) => {
                        if side.occupant(slot).is_none() {
                            return Err(invalid(format!("slot {} is empty", slot + 1)));
                        }
                        let idx = self.check_switch_target(player, *n, &claimed)?;
                        claimed.push(idx);
                    }
                },
            }
        }
        Ok(())
    }

    fn ready(&self) -> bool {
        [&self.p1, &self.p2]
            .iter()
            .all(|s| !s.needs_decision() || s.staged.is_some())
    }

    fn take_staged(&mut self, player: Player) -> Vec<Action> {
        match self.side_mut(player).staged.take() {
            Some(s) => parse_choice(&s).unwrap_or_else(|_| vec![Action::Default]),
            None => Vec::new(),
        }
    }

    /// Expand a side's raw actions to exactly one per slot
    fn normalize(&self, player: Player, mut actions: Vec<Action>) -> Vec<Action> {
        let slots = self.side(player).active.len();
        if actions.len() == 1 && matches!(actions[0], Action::Default) && slots > 1 {
            return vec![Action::Default; slots];
        }
        actions.resize(slots, Action::Pass);
        actions
    }

    fn apply_switches(&mut self, player: Player, actions: &[Action]) {
        let forced_flags = match &self.side(player).pending {
            Pending::ForceSwitch(flags) => flags.clone(),
            _ => Vec::new(),
        };

        for (slot, action) in actions.iter().enumerate() {
            let side = self.side_mut(player);
            match action {
                Action::Switch(n) => {
                    let idx = n - 1;
                    if idx < side.team.len() && !side.team[idx].fainted() && side.is_benched(idx) {
                        side.active[slot] = Some(idx);
                        tracing::debug!(
                            side = %player,
                            species = %side.team[idx].spec.species,
                            slot,
                            "switched in"
                        );
                    }
                }
                Action::Default => {
                    // A defaulted forced switch takes the first bench member
                    if forced_flags.get(slot).copied().unwrap_or(false) {
                        if let Some(idx) = side.first_bench() {
                            side.active[slot] = Some(idx);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn apply_tera(&mut self, player: Player, actions: &[Action]) {
        for (slot, action) in actions.iter().enumerate() {
            if let Action::Move { tera: true, .. } = action {
                let side = self.side_mut(player);
                if side.tera_used {
                    continue;
                }
                if let Some(idx) = side.occupant(slot) {
                    if side.team[idx].spec.tera_type.is_some() {
                        side.team[idx].terastallized = true;
                        side.tera_used = true;
                        tracing::debug!(
                            side = %player,
                            species = %side.team[idx].spec.species,
                            "terastallized"
                        );
                    }
                }
            }
        }
    }

    fn run_moves(&mut self, p1_actions: &[Action], p2_actions: &[Action]) {
        let mut queue: Vec<QueuedMove> = Vec::new();
        for (player, actions) in [(Player::P1, p1_actions), (Player::P2, p2_actions)] {
            let side = self.side(player);
            for (slot, action) in actions.iter().enumerate() {
                let Some(idx) = side.occupant(slot) else {
                    continue;
                };
                let c = &side.team[idx];
                if c.fainted() {
                    continue;
                }
                let (pick, target) = match action {
                    Action::Move { slot: pick, target, .. } => (*pick, *target),
                    // Defaulted slots use their first move with pp left
                    Action::Default => match c.pp.iter().position(|&p| p > 0) {
                        Some(mi) => (mi + 1, None),
                        None => (1, None),
                    },
                    _ => continue,
                };
                queue.push(QueuedMove {
                    player,
                    slot,
                    pick,
                    target,
                    speed: c.spec.stats.spe,
                });
            }
        }

        // Faster combatants act first; p1 wins speed ties
        queue.sort_by(|a, b| {
            b.speed
                .cmp(&a.speed)
                .then_with(|| a.player.as_str().cmp(b.player.as_str()))
        });

        for queued in queue {
            if self.p1.all_fainted() || self.p2.all_fainted() {
                break;
            }
            self.execute_move(&queued);
        }
    }

    fn execute_move(&mut self, queued: &QueuedMove) {
        let (att_side, def_side) = match queued.player {
            Player::P1 => (&mut self.p1, &mut self.p2),
            Player::P2 => (&mut self.p2, &mut self.p1),
        };
        let Some(att_idx) = att_side.active.get(queued.slot).copied().flatten() else {
            return;
        };
        if att_side.team[att_idx].fainted() {
            return;
        }

        // Resolve the pick against current pp; an exhausted roster struggles
        let (mv, struggling) = {
            let c = &att_side.team[att_idx];
            if c.out_of_pp() {
                (MoveSpec::struggle(), true)
            } else if queued.pick >= 1
                && queued.pick <= c.spec.moves.len()
                && c.pp[queued.pick - 1] > 0
            {
                (c.spec.moves[queued.pick - 1].clone(), false)
            } else {
                return;
            }
        };
        if !struggling {
            att_side.team[att_idx].pp[queued.pick - 1] -= 1;
        }

        let category = MoveCategory::from_name(&mv.category);
        if !category.is_damaging() || mv.base_power == 0 {
            return;
        }

        let target_spec = MoveTarget::from_name(&mv.target);
        let targets: Vec<usize> = if target_spec.is_spread() {
            def_side
                .active
                .iter()
                .filter_map(|s| *s)
                .filter(|&i| !def_side.team[i].fainted())
                .collect()
        } else {
            // A chosen opposing slot, redirected to the first standing foe
            // when it is empty or already down; ally-frame targets fall
            // through to the default foe as well.
            let chosen = queued.target.and_then(|t| {
                if t < 0 {
                    let slot = (-(t as i16) - 1) as usize;
                    def_side.active.get(slot).copied().flatten()
                } else {
                    None
                }
            });
            match chosen {
                Some(i) if !def_side.team[i].fainted() => vec![i],
                _ => def_side
                    .active
                    .iter()
                    .filter_map(|s| *s)
                    .find(|&i| !def_side.team[i].fainted())
                    .into_iter()
                    .collect(),
            }
        };

        for def_idx in targets {
            let dealt = damage(&att_side.team[att_idx], &def_side.team[def_idx], &mv, category);
            let defender = &mut def_side.team[def_idx];
            defender.hp = defender.hp.saturating_sub(dealt);
            tracing::debug!(
                user = %att_side.team[att_idx].spec.species,
                target = %def_side.team[def_idx].spec.species,
                name = %mv.name,
                dealt,
                "move resolved"
            );
        }
    }

    /// Flag fainted slots a bench member can refill; empties the rest
    fn replacement_flags(&mut self, player: Player) -> Option<Vec<bool>> {
        let side = self.side_mut(player);
        let mut spare = side
            .team
            .iter()
            .enumerate()
            .filter(|(i, c)| !c.fainted() && side.is_benched(*i))
            .count();

        let mut flags = vec![false; side.active.len()];
        for slot in 0..side.active.len() {
            if side.active[slot].is_some_and(|i| side.team[i].fainted()) {
                side.active[slot] = None;
                if spare > 0 {
                    flags[slot] = true;
                    spare -= 1;
                }
            }
        }

        if flags.iter().any(|&f| f) {
            Some(flags)
        } else {
            None
        }
    }

    fn update_pendings(&mut self) {
        if self.p1.all_fainted() || self.p2.all_fainted() {
            self.ended = true;
            self.winner = match (self.p1.all_fainted(), self.p2.all_fainted()) {
                (true, true) => None,
                (true, false) => Some(self.p2.trainer.clone()),
                _ => Some(self.p1.trainer.clone()),
            };
            tracing::debug!(winner = ?self.winner, turn = self.turn, "battle ended");
            return;
        }

        let p1_flags = self.replacement_flags(Player::P1);
        let p2_flags = self.replacement_flags(Player::P2);
        self.p1.pending = match &p1_flags {
            Some(flags) => Pending::ForceSwitch(flags.clone()),
            None if p2_flags.is_some() => Pending::Waiting,
            None => Pending::Turn,
        };
        self.p2.pending = match p2_flags {
            Some(flags) => Pending::ForceSwitch(flags),
            None if p1_flags.is_some() => Pending::Waiting,
            None => Pending::Turn,
        };
    }

    fn resolve(&mut self) {
        let force_phase = matches!(self.p1.pending, Pending::ForceSwitch(_))
            || matches!(self.p2.pending, Pending::ForceSwitch(_));

        let p1_raw = self.take_staged(Player::P1);
        let p2_raw = self.take_staged(Player::P2);
        let p1_actions = self.normalize(Player::P1, p1_raw);
        let p2_actions = self.normalize(Player::P2, p2_raw);

        self.apply_switches(Player::P1, &p1_actions);
        self.apply_switches(Player::P2, &p2_actions);

        if !force_phase {
            self.apply_tera(Player::P1, &p1_actions);
            self.apply_tera(Player::P2, &p2_actions);
            self.run_moves(&p1_actions, &p2_actions);
            self.turn += 1;
        }

        self.update_pendings();
        self.rqid += 1;
    }
}

impl Simulator for LocalBattle {
    fn request(&self, side: Player) -> Option<Value> {
        self.build_request(side)
    }

    fn choose(&mut self, side: Player, choice: &str) -> Result<(), SimError> {
        if self.ended {
            return Err(SimError::BattleEnded);
        }
        if !self.side(side).needs_decision() {
            return Err(SimError::NoPendingDecision(side));
        }

        let actions = parse_choice(choice).map_err(|e| SimError::InvalidChoice {
            side,
            reason: e.to_string(),
        })?;
        self.validate(side, &actions)?;

        self.side_mut(side).staged = Some(choice.to_string());
        if self.ready() {
            self.resolve();
        }
        Ok(())
    }

    fn ended(&self) -> bool {
        self.ended
    }

    fn winner(&self) -> Option<String> {
        self.winner.clone()
    }

    fn export_state(&self) -> Result<SavedBattle, SimError> {
        Ok(SavedBattle::new(serde_json::to_value(self)?))
    }

    fn import_state(&self, saved: &SavedBattle) -> Result<Box<dyn Simulator>, SimError> {
        let battle: LocalBattle = serde_json::from_value(saved.data().clone())?;
        Ok(Box::new(battle))
    }
}

/// Deterministic damage: the standard formula with STAB and the type
/// chart, no roll, no crits
fn damage(attacker: &Combatant, defender: &Combatant, mv: &MoveSpec, category: MoveCategory) -> u32 {
    let (attack, defense) = match category {
        MoveCategory::Physical => (attacker.spec.stats.atk, defender.spec.stats.def),
        MoveCategory::Special => (attacker.spec.stats.spa, defender.spec.stats.spd),
        MoveCategory::Status => return 0,
    };

    let level = f32::from(attacker.spec.level);
    let base = ((2.0 * level / 5.0 + 2.0) * mv.base_power as f32 * attack as f32
        / defense.max(1) as f32)
        / 50.0
        + 2.0;

    let move_type = Type::from_name(&mv.move_type);
    let stab = move_type.is_some_and(|t| attacker.current_types().contains(&t));
    let effectiveness = move_type.map_or(1.0, |t| t.effectiveness_against(&defender.current_types()));

    (base * if stab { 1.5 } else { 1.0 } * effectiveness) as u32
}
