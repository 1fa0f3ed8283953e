// MIDI control-change controller names.
//
// Lookup is by normalized name (see `event::normalize_label`), so
// "Bank Select", "bank-select", and "BankSelect" are all the same
// controller. Several controllers have more than one common name; every
// alias is listed.

use crate::event::normalize_label;

/// (normalized name, controller number)
const CONTROLLERS: &[(&str, u8)] = &[
    ("bankselect", 0),
    ("bankselectmsb", 0),
    ("modulation", 1),
    ("modulationwheel", 1),
    ("modwheel", 1),
    ("breath", 2),
    ("breathcontroller", 2),
    ("foot", 4),
    ("footcontroller", 4),
    ("footpedal", 4),
    ("portamentotime", 5),
    ("dataentry", 6),
    ("dataentrymsb", 6),
    ("volume", 7),
    ("channelvolume", 7),
    ("mainvolume", 7),
    ("balance", 8),
    ("pan", 10),
    ("expression", 11),
    ("effectcontrol1", 12),
    ("effectcontrol2", 13),
    ("generalpurpose1", 16),
    ("generalpurpose2", 17),
    ("generalpurpose3", 18),
    ("generalpurpose4", 19),
    ("bankselectlsb", 32),
    ("modulationlsb", 33),
    ("breathlsb", 34),
    ("footlsb", 36),
    ("portamentotimelsb", 37),
    ("dataentrylsb", 38),
    ("volumelsb", 39),
    ("balancelsb", 40),
    ("panlsb", 42),
    ("expressionlsb", 43),
    ("sustain", 64),
    ("sustainpedal", 64),
    ("damper", 64),
    ("damperpedal", 64),
    ("hold", 64),
    ("hold1", 64),
    ("portamento", 65),
    ("sostenuto", 66),
    ("sostenutopedal", 66),
    ("soft", 67),
    ("softpedal", 67),
    ("legato", 68),
    ("legatofootswitch", 68),
    ("hold2", 69),
    ("soundvariation", 70),
    ("soundcontroller1", 70),
    ("timbre", 71),
    ("resonance", 71),
    ("harmoniccontent", 71),
    ("soundcontroller2", 71),
    ("releasetime", 72),
    ("soundcontroller3", 72),
    ("attacktime", 73),
    ("soundcontroller4", 73),
    ("brightness", 74),
    ("cutoff", 74),
    ("soundcontroller5", 74),
    ("decaytime", 75),
    ("soundcontroller6", 75),
    ("vibratorate", 76),
    ("soundcontroller7", 76),
    ("vibratodepth", 77),
    ("soundcontroller8", 77),
    ("vibratodelay", 78),
    ("soundcontroller9", 78),
    ("soundcontroller10", 79),
    ("generalpurpose5", 80),
    ("generalpurpose6", 81),
    ("generalpurpose7", 82),
    ("generalpurpose8", 83),
    ("portamentocontrol", 84),
    ("highresolutionvelocityprefix", 88),
    ("reverb", 91),
    ("reverbdepth", 91),
    ("effects1depth", 91),
    ("tremolo", 92),
    ("tremolodepth", 92),
    ("effects2depth", 92),
    ("chorus", 93),
    ("chorusdepth", 93),
    ("effects3depth", 93),
    ("celeste", 94),
    ("detune", 94),
    ("effects4depth", 94),
    ("phaser", 95),
    ("phaserdepth", 95),
    ("effects5depth", 95),
    ("dataincrement", 96),
    ("datadecrement", 97),
    ("nrpnlsb", 98),
    ("nonregisteredparameternumberlsb", 98),
    ("nrpnmsb", 99),
    ("nonregisteredparameternumbermsb", 99),
    ("rpnlsb", 100),
    ("registeredparameternumberlsb", 100),
    ("rpnmsb", 101),
    ("registeredparameternumbermsb", 101),
    ("allsoundoff", 120),
    ("resetallcontrollers", 121),
    ("localcontrol", 122),
    ("allnotesoff", 123),
    ("omnioff", 124),
    ("omnimodeoff", 124),
    ("omnion", 125),
    ("omnimodeon", 125),
    ("monoon", 126),
    ("monomodeon", 126),
    ("polyon", 127),
    ("polymodeon", 127),
];

/// A MIDI controller number (0-127).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Controller(u8);

impl Controller {
    pub fn number(self) -> u8 {
        self.0
    }

    /// Look up a controller by name, ignoring case, spaces, hyphens and
    /// underscores.
    pub fn parse(name: &str) -> Option<Controller> {
        let wanted = normalize_label(name);
        CONTROLLERS
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|&(_, number)| Controller(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(name: &str) -> Option<u8> {
        Controller::parse(name).map(Controller::number)
    }

    #[test]
    fn spellings_are_interchangeable() {
        for name in ["Bank Select", "bank-select", "BANK_SELECT", "BankSelect"] {
            assert_eq!(number(name), Some(0), "{name}");
        }
    }

    #[test]
    fn common_controllers() {
        assert_eq!(number("Modulation Wheel"), Some(1));
        assert_eq!(number("volume"), Some(7));
        assert_eq!(number("Pan"), Some(10));
        assert_eq!(number("Expression"), Some(11));
        assert_eq!(number("Sustain Pedal"), Some(64));
        assert_eq!(number("damper"), Some(64));
        assert_eq!(number("All Notes Off"), Some(123));
    }

    #[test]
    fn unknown_names_fail() {
        assert_eq!(number("wobble"), None);
        assert_eq!(number(""), None);
        assert_eq!(number("7"), None);
    }

    #[test]
    fn table_is_consistent() {
        for (name, number) in CONTROLLERS {
            assert!(*number <= 127, "{name} maps outside the 7-bit range");
            assert_eq!(normalize_label(name), *name, "{name} is not normalized");
        }
    }
}
