//! Box score counters
//!
//! `StatKind` names every counter the engine records through `Stat` events.
//! Minutes and plus-minus are accumulated directly and never emitted as deltas.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Gs,
    Pts,
    Fg,
    Fga,
    FgAtRim,
    FgaAtRim,
    FgLowPost,
    FgaLowPost,
    FgMidRange,
    FgaMidRange,
    Tp,
    Tpa,
    Ft,
    Fta,
    Orb,
    Drb,
    Ast,
    Tov,
    Stl,
    Blk,
    /// Shot attempts blocked
    Ba,
    Pf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StatLine {
    pub gs: u32,
    /// Minutes played
    pub min: f64,
    pub pts: u32,
    pub fg: u32,
    pub fga: u32,
    pub fg_at_rim: u32,
    pub fga_at_rim: u32,
    pub fg_low_post: u32,
    pub fga_low_post: u32,
    pub fg_mid_range: u32,
    pub fga_mid_range: u32,
    pub tp: u32,
    pub tpa: u32,
    pub ft: u32,
    pub fta: u32,
    pub orb: u32,
    pub drb: u32,
    pub ast: u32,
    pub tov: u32,
    pub stl: u32,
    pub blk: u32,
    pub ba: u32,
    pub pf: u32,
    /// Plus-minus
    pub pm: i32,
}

impl StatLine {
    pub fn add(&mut self, kind: StatKind, amount: u32) {
        *self.counter_mut(kind) += amount;
    }

    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Gs => self.gs,
            StatKind::Pts => self.pts,
            StatKind::Fg => self.fg,
            StatKind::Fga => self.fga,
            StatKind::FgAtRim => self.fg_at_rim,
            StatKind::FgaAtRim => self.fga_at_rim,
            StatKind::FgLowPost => self.fg_low_post,
            StatKind::FgaLowPost => self.fga_low_post,
            StatKind::FgMidRange => self.fg_mid_range,
            StatKind::FgaMidRange => self.fga_mid_range,
            StatKind::Tp => self.tp,
            StatKind::Tpa => self.tpa,
            StatKind::Ft => self.ft,
            StatKind::Fta => self.fta,
            StatKind::Orb => self.orb,
            StatKind::Drb => self.drb,
            StatKind::Ast => self.ast,
            StatKind::Tov => self.tov,
            StatKind::Stl => self.stl,
            StatKind::Blk => self.blk,
            StatKind::Ba => self.ba,
            StatKind::Pf => self.pf,
        }
    }

    fn counter_mut(&mut self, kind: StatKind) -> &mut u32 {
        match kind {
            StatKind::Gs => &mut self.gs,
            StatKind::Pts => &mut self.pts,
            StatKind::Fg => &mut self.fg,
            StatKind::Fga => &mut self.fga,
            StatKind::FgAtRim => &mut self.fg_at_rim,
            StatKind::FgaAtRim => &mut self.fga_at_rim,
            StatKind::FgLowPost => &mut self.fg_low_post,
            StatKind::FgaLowPost => &mut self.fga_low_post,
            StatKind::FgMidRange => &mut self.fg_mid_range,
            StatKind::FgaMidRange => &mut self.fga_mid_range,
            StatKind::Tp => &mut self.tp,
            StatKind::Tpa => &mut self.tpa,
            StatKind::Ft => &mut self.ft,
            StatKind::Fta => &mut self.fta,
            StatKind::Orb => &mut self.orb,
            StatKind::Drb => &mut self.drb,
            StatKind::Ast => &mut self.ast,
            StatKind::Tov => &mut self.tov,
            StatKind::Stl => &mut self.stl,
            StatKind::Blk => &mut self.blk,
            StatKind::Ba => &mut self.ba,
            StatKind::Pf => &mut self.pf,
        }
    }

    /// Total rebounds
    pub fn trb(&self) -> u32 {
        self.orb + self.drb
    }

    pub fn fg_pct(&self) -> Option<f64> {
        pct(self.fg, self.fga)
    }

    pub fn tp_pct(&self) -> Option<f64> {
        pct(self.tp, self.tpa)
    }

    pub fn ft_pct(&self) -> Option<f64> {
        pct(self.ft, self.fta)
    }
}

fn pct(made: u32, att: u32) -> Option<f64> {
    (att > 0).then(|| made as f64 / att as f64)
}

/// Team totals plus the per-period scoring line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TeamStatLine {
    pub totals: StatLine,
    /// Points per period, overtime periods appended
    pub pts_qtrs: Vec<u32>,
}

impl TeamStatLine {
    pub fn pts(&self) -> u32 {
        self.totals.pts
    }
}
