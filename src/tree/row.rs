// src/tree/row.rs

//! Wire types for the flat organizational row list returned by the API.

use serde::Deserialize;

/// One row of the flat hierarchy as served by
/// `GET /api/struktur-organisasi`.
///
/// Upstream data quality is not guaranteed, so every field is defaulted:
/// a row with missing or null fields deserializes to safe empties instead
/// of failing the whole fetch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrgRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default, alias = "nama_jabatan")]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub unit_kerja: Option<String>,
    /// Depth hint only; the tree is derived from `parent_id`, never from this.
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub order_index: Option<i64>,
    #[serde(default)]
    pub bezetting: Option<i64>,
    #[serde(default)]
    pub kebutuhan_pegawai: Option<i64>,
    #[serde(default)]
    pub kelas_jabatan: Option<String>,
    #[serde(default)]
    pub jenis_jabatan: Option<String>,
    #[serde(default)]
    pub is_pusat: Option<bool>,
}

impl OrgRow {
    /// Job tier of this row, `Unknown` when the category text is absent or
    /// unrecognized.
    pub fn tier(&self) -> JobTier {
        JobTier::parse(self.jenis_jabatan.as_deref())
    }

    /// Rows without an explicit flag count as "pusat".
    pub fn is_pusat(&self) -> bool {
        self.is_pusat.unwrap_or(true)
    }
}

/// Closed set of job-tier categories used as an ordinal ranking key for the
/// org chart.  The mapping is total: anything unrecognized falls into
/// `Unknown` and sinks below every known tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobTier {
    EselonI,
    EselonII,
    EselonIII,
    EselonIV,
    JabatanFungsional,
    JabatanPelaksana,
    PegawaiDpk,
    PegawaiCltn,
    #[default]
    Unknown,
}

impl JobTier {
    /// Parse a category string as stored in `jenis_jabatan`.  Matching is
    /// trim- and case-insensitive.
    pub fn parse(text: Option<&str>) -> Self {
        match text.unwrap_or("").trim().to_uppercase().as_str() {
            "ESELON I" => JobTier::EselonI,
            "ESELON II" => JobTier::EselonII,
            "ESELON III" => JobTier::EselonIII,
            "ESELON IV" => JobTier::EselonIV,
            "JABATAN FUNGSIONAL" => JobTier::JabatanFungsional,
            "JABATAN PELAKSANA" => JobTier::JabatanPelaksana,
            "PEGAWAI DPK" => JobTier::PegawaiDpk,
            "PEGAWAI CLTN" => JobTier::PegawaiCltn,
            _ => JobTier::Unknown,
        }
    }

    /// Ordinal rank used for depth alignment.  Lower ranks sit higher in
    /// the chart; unknown categories sink to the bottom.
    pub fn rank(self) -> u32 {
        match self {
            JobTier::EselonI => 1,
            JobTier::EselonII => 2,
            JobTier::EselonIII => 3,
            JobTier::EselonIV => 4,
            JobTier::JabatanFungsional => 5,
            JobTier::JabatanPelaksana => 6,
            JobTier::PegawaiDpk => 7,
            JobTier::PegawaiCltn => 8,
            JobTier::Unknown => 99,
        }
    }

    /// Canonical category string as the server stores it; `Unknown` rows
    /// carry no category at all.
    pub fn category(self) -> Option<&'static str> {
        match self {
            JobTier::EselonI => Some("ESELON I"),
            JobTier::EselonII => Some("ESELON II"),
            JobTier::EselonIII => Some("ESELON III"),
            JobTier::EselonIV => Some("ESELON IV"),
            JobTier::JabatanFungsional => Some("JABATAN FUNGSIONAL"),
            JobTier::JabatanPelaksana => Some("JABATAN PELAKSANA"),
            JobTier::PegawaiDpk => Some("PEGAWAI DPK"),
            JobTier::PegawaiCltn => Some("PEGAWAI CLTN"),
            JobTier::Unknown => None,
        }
    }

    /// Short label for display in the chart pane.
    pub fn label(self) -> &'static str {
        match self {
            JobTier::EselonI => "Eselon I",
            JobTier::EselonII => "Eselon II",
            JobTier::EselonIII => "Eselon III",
            JobTier::EselonIV => "Eselon IV",
            JobTier::JabatanFungsional => "Jabatan Fungsional",
            JobTier::JabatanPelaksana => "Jabatan Pelaksana",
            JobTier::PegawaiDpk => "Pegawai DPK",
            JobTier::PegawaiCltn => "Pegawai CLTN",
            JobTier::Unknown => "-",
        }
    }
}
