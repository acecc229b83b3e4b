//! CTI3 Keyword Registry
//!
//! The closed set of keywords the parser recognizes, either as metadata
//! property keys or as structural markers around the format and data blocks.
//! See <https://argyllcms.com/doc/ti3_format.html>.
//!
//! Lines whose first token is not one of these keywords are skipped by the
//! parser rather than rejected.

use std::fmt;

/// A recognized CTI3 keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Keyword {
    /// Free-form description of the file contents
    Descriptor,
    /// Program or person that produced the file
    Originator,
    /// Creation date
    Created,
    /// Device class (INPUT, OUTPUT, DISPLAY)
    DeviceClass,
    /// Total ink limit in percent
    TotalInkLimit,
    /// Illuminant white point as XYZ
    IlluminantWhitePointXyz,
    /// Absolute luminance in cd/m^2
    LuminanceXyzCdm2,
    /// Whether values are normalized to Y = 100
    #[cfg_attr(feature = "serde", serde(rename = "NORMALIZED_TO_Y_100"))]
    NormalizedToY100,
    /// Instrument the target was laid out for
    TargetInstrument,
    /// Whether the instrument was spectral
    InstrumentTypeSpectral,
    /// Display refresh mode
    DisplayTypeRefresh,
    /// Steps of the single-dimension wedges
    SingleDimSteps,
    /// Color representation (e.g. XYZ_RGB)
    ColorRep,
    /// Number of spectral bands
    SpectralBands,
    /// First spectral band in nm
    SpectralStartNm,
    /// Last spectral band in nm
    SpectralEndNm,
    /// Declared number of fields
    NumberOfFields,
    /// Opens the field format block
    BeginDataFormat,
    /// Closes the field format block
    EndDataFormat,
    /// Declared number of data rows
    NumberOfSets,
    /// Opens the data block
    BeginData,
    /// Closes the data block
    EndData,
}

impl Keyword {
    /// All keywords, in declaration order
    pub const ALL: [Keyword; 22] = [
        Keyword::Descriptor,
        Keyword::Originator,
        Keyword::Created,
        Keyword::DeviceClass,
        Keyword::TotalInkLimit,
        Keyword::IlluminantWhitePointXyz,
        Keyword::LuminanceXyzCdm2,
        Keyword::NormalizedToY100,
        Keyword::TargetInstrument,
        Keyword::InstrumentTypeSpectral,
        Keyword::DisplayTypeRefresh,
        Keyword::SingleDimSteps,
        Keyword::ColorRep,
        Keyword::SpectralBands,
        Keyword::SpectralStartNm,
        Keyword::SpectralEndNm,
        Keyword::NumberOfFields,
        Keyword::BeginDataFormat,
        Keyword::EndDataFormat,
        Keyword::NumberOfSets,
        Keyword::BeginData,
        Keyword::EndData,
    ];

    /// Look up a keyword by its exact textual form
    pub fn lookup(s: &str) -> Option<Self> {
        match s {
            "DESCRIPTOR" => Some(Self::Descriptor),
            "ORIGINATOR" => Some(Self::Originator),
            "CREATED" => Some(Self::Created),
            "DEVICE_CLASS" => Some(Self::DeviceClass),
            "TOTAL_INK_LIMIT" => Some(Self::TotalInkLimit),
            "ILLUMINANT_WHITE_POINT_XYZ" => Some(Self::IlluminantWhitePointXyz),
            "LUMINANCE_XYZ_CDM2" => Some(Self::LuminanceXyzCdm2),
            "NORMALIZED_TO_Y_100" => Some(Self::NormalizedToY100),
            "TARGET_INSTRUMENT" => Some(Self::TargetInstrument),
            "INSTRUMENT_TYPE_SPECTRAL" => Some(Self::InstrumentTypeSpectral),
            "DISPLAY_TYPE_REFRESH" => Some(Self::DisplayTypeRefresh),
            "SINGLE_DIM_STEPS" => Some(Self::SingleDimSteps),
            "COLOR_REP" => Some(Self::ColorRep),
            "SPECTRAL_BANDS" => Some(Self::SpectralBands),
            "SPECTRAL_START_NM" => Some(Self::SpectralStartNm),
            "SPECTRAL_END_NM" => Some(Self::SpectralEndNm),
            "NUMBER_OF_FIELDS" => Some(Self::NumberOfFields),
            "BEGIN_DATA_FORMAT" => Some(Self::BeginDataFormat),
            "END_DATA_FORMAT" => Some(Self::EndDataFormat),
            "NUMBER_OF_SETS" => Some(Self::NumberOfSets),
            "BEGIN_DATA" => Some(Self::BeginData),
            "END_DATA" => Some(Self::EndData),
            _ => None,
        }
    }

    /// Check whether `s` is exactly the textual form of a keyword
    pub fn is_keyword(s: &str) -> bool {
        Self::lookup(s).is_some()
    }

    /// Canonical textual form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Descriptor => "DESCRIPTOR",
            Self::Originator => "ORIGINATOR",
            Self::Created => "CREATED",
            Self::DeviceClass => "DEVICE_CLASS",
            Self::TotalInkLimit => "TOTAL_INK_LIMIT",
            Self::IlluminantWhitePointXyz => "ILLUMINANT_WHITE_POINT_XYZ",
            Self::LuminanceXyzCdm2 => "LUMINANCE_XYZ_CDM2",
            Self::NormalizedToY100 => "NORMALIZED_TO_Y_100",
            Self::TargetInstrument => "TARGET_INSTRUMENT",
            Self::InstrumentTypeSpectral => "INSTRUMENT_TYPE_SPECTRAL",
            Self::DisplayTypeRefresh => "DISPLAY_TYPE_REFRESH",
            Self::SingleDimSteps => "SINGLE_DIM_STEPS",
            Self::ColorRep => "COLOR_REP",
            Self::SpectralBands => "SPECTRAL_BANDS",
            Self::SpectralStartNm => "SPECTRAL_START_NM",
            Self::SpectralEndNm => "SPECTRAL_END_NM",
            Self::NumberOfFields => "NUMBER_OF_FIELDS",
            Self::BeginDataFormat => "BEGIN_DATA_FORMAT",
            Self::EndDataFormat => "END_DATA_FORMAT",
            Self::NumberOfSets => "NUMBER_OF_SETS",
            Self::BeginData => "BEGIN_DATA",
            Self::EndData => "END_DATA",
        }
    }

    /// Check if this keyword describes file structure rather than metadata
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::NumberOfFields
                | Self::BeginDataFormat
                | Self::EndDataFormat
                | Self::NumberOfSets
                | Self::BeginData
                | Self::EndData
        )
    }

    /// Check if the writer derives this keyword's line from the document shape
    ///
    /// Such keywords are never emitted from the property map. `END_DATA_FORMAT`
    /// and `END_DATA` carrying a value are read back as properties, so they
    /// are written like any other property.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            Self::NumberOfFields | Self::BeginDataFormat | Self::NumberOfSets | Self::BeginData
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
