//! jif-json contains the JSON schemas used by jif, both for the datapath
//! descriptions that it reads and for the solved configurations that it emits.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};

/// Solved configuration JSON schema.
///
/// This is the document printed by the `jif` binary after a successful solve.
/// It describes the JESD204 mode, the transceiver PLL settings and the
/// datapath rate change chosen for one converter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SolvedConfiguration {
    /// Name of the converter this configuration applies to.
    pub converter: String,
    /// Selected JESD204 quick configuration mode.
    pub jesd: JesdMode,
    /// Transceiver PLL settings.
    pub pll: PllConfig,
    /// Overall datapath decimation, for receive converters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimation: Option<u32>,
    /// Overall datapath interpolation, for transmit converters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<u32>,
}

/// JESD204 mode JSON schema.
///
/// Contains the link parameters of the selected quick configuration mode
/// together with the link clocks derived from them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
pub struct JesdMode {
    /// Mode number, as it appears in the converter datasheet.
    pub mode: String,
    /// JESD204 protocol revision.
    pub jesd_class: JesdClass,
    /// Index of the mode across all the tables of the converter.
    pub global_index: u32,
    /// Lanes per link.
    pub L: u32,
    /// Converters per link.
    pub M: u32,
    /// Octets per frame.
    pub F: u32,
    /// Samples per converter per frame.
    pub S: u32,
    /// Converter resolution.
    pub N: u32,
    /// Bits per sample container.
    pub Np: u32,
    /// Frames per multiframe.
    pub K: u32,
    /// Control bits per sample.
    pub CS: u32,
    /// Multiblocks per extended multiblock (JESD204C only).
    pub E: u32,
    /// High density mode.
    pub HD: bool,
    /// Sample clock in samples per second.
    pub sample_clock: f64,
    /// Bit clock (lane rate) in bits per second.
    pub bit_clock: f64,
    /// Multiframe clock (LMFC) in Hz.
    pub multiframe_clock: f64,
    /// Frame clock in Hz.
    pub frame_clock: f64,
    /// Link layer core clock in Hz.
    pub link_clock: f64,
    /// Samples per link layer clock cycle.
    pub transport_samples_per_clock: f64,
}

/// JESD204 protocol revision.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JesdClass {
    /// JESD204B, using 8b/10b encoding.
    Jesd204B,
    /// JESD204C, using 64b/66b encoding.
    Jesd204C,
}

/// Transceiver PLL JSON schema.
///
/// Only the fields that apply to the PLL type are present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PllConfig {
    /// PLL type.
    #[serde(rename = "type")]
    pub pll_type: PllType,
    /// Reference clock divider.
    pub m: u32,
    /// Output divider.
    pub d: u32,
    /// CPLL feedback divider N1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n1: Option<u32>,
    /// CPLL feedback divider N2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n2: Option<u32>,
    /// QPLL feedback divider (integer part).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// QPLL output rate divider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clkout_rate: Option<u32>,
    /// Sigma-delta modulator numerator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdm_data: Option<u32>,
    /// Sigma-delta modulator width in bits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdm_width: Option<u32>,
    /// Fractional part of the feedback divider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frac: Option<f64>,
    /// Full feedback divider, `n + frac`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_dot_frac: Option<f64>,
    /// Whether the 7-series GTX QPLL runs in its lower VCO band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_band: Option<bool>,
    /// Whether the UltraScale QPLL runs in high lane rate mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_rate: Option<bool>,
    /// VCO frequency in Hz.
    pub vco: f64,
    /// Lane rate produced by this setting, in bits per second.
    pub lane_rate: f64,
}

/// Transceiver PLL types.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PllType {
    /// Channel PLL.
    #[default]
    Cpll,
    /// Quad PLL (QPLL0 on UltraScale devices).
    Qpll,
    /// Second quad PLL of UltraScale devices.
    Qpll1,
}

macro_rules! impl_str_conv {
    ($ty:ty, $($s:expr => $v:ident),*) => {
        impl std::str::FromStr for $ty {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, ()> {
                Ok(match s {
                    $(
                        $s => <$ty>::$v,
                    )*
                        _ => return Err(()),
                })
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                write!(f, "{}", match self {
                    $(
                        <$ty>::$v => $s,
                    )*
                })
            }
        }
    }
}

impl_str_conv!(JesdClass,
               "jesd204b" => Jesd204B,
               "jesd204c" => Jesd204C);

impl_str_conv!(PllType,
               "cpll" => Cpll,
               "qpll" => Qpll,
               "qpll1" => Qpll1);

/// Datapath JSON schema.
///
/// This is read by the `jif` binary to describe the digital datapath of the
/// converter. The datapath determines the ratio between the converter clock
/// and the JESD204 sample clock.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Datapath {
    /// Receive datapath (coarse and fine DDCs).
    Rx(RxDatapath),
    /// Transmit datapath (coarse and fine DUCs).
    Tx(TxDatapath),
}

/// Receive datapath JSON schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RxDatapath {
    /// Coarse digital down-converters.
    pub cddc: Vec<DdcStage>,
    /// Fine digital down-converters.
    pub fddc: Vec<DdcStage>,
}

/// Digital down-converter stage JSON schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DdcStage {
    /// Whether the stage is in use.
    pub enabled: bool,
    /// Decimation factor of the stage.
    pub decimation: u32,
    /// NCO frequency in Hz.
    #[serde(default)]
    pub nco_frequency: f64,
    /// NCO phase in degrees.
    #[serde(default)]
    pub nco_phase: f64,
    /// Index of the coarse DDC feeding this stage (fine DDCs only).
    ///
    /// Indices are 0-based: `Some(0)` is the first entry of `cddc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
}

/// Transmit datapath JSON schema.
///
/// The interpolation factors are shared by all the stages of each kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TxDatapath {
    /// Coarse digital up-converters.
    pub cduc: Vec<DucStage>,
    /// Fine digital up-converters.
    pub fduc: Vec<DucStage>,
    /// Interpolation of the coarse DUCs.
    pub cduc_interpolation: u32,
    /// Interpolation of the fine DUCs.
    pub fduc_interpolation: u32,
}

/// Digital up-converter stage JSON schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DucStage {
    /// Whether the stage is in use.
    pub enabled: bool,
    /// NCO frequency in Hz.
    #[serde(default)]
    pub nco_frequency: f64,
    /// NCO phase in degrees.
    #[serde(default)]
    pub nco_phase: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn str_conv() {
        assert_eq!("jesd204c".parse::<JesdClass>(), Ok(JesdClass::Jesd204C));
        assert_eq!(PllType::Qpll1.to_string(), "qpll1");
        assert!("qpll2".parse::<PllType>().is_err());
    }

    #[test]
    fn datapath_from_json() {
        let json = r#"{
  "rx": {
    "cddc": [{ "enabled": true, "decimation": 2 }],
    "fddc": [{ "enabled": true, "decimation": 4, "source": 0 }]
  }
}"#;
        let datapath: Datapath = serde_json::from_str(json).unwrap();
        let Datapath::Rx(rx) = datapath else {
            panic!("expected a receive datapath");
        };
        assert_eq!(rx.cddc[0].decimation, 2);
        assert_eq!(rx.fddc[0].source, Some(0));
        assert_eq!(rx.fddc[0].nco_frequency, 0.0);
    }

    #[test]
    fn pll_config_skips_absent_fields() {
        let config = PllConfig {
            pll_type: PllType::Cpll,
            m: 1,
            d: 2,
            n1: Some(5),
            n2: Some(4),
            vco: 2.5e9,
            lane_rate: 2.5e9,
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "cpll");
        assert!(json.get("sdm_data").is_none());
    }
}
