//! Source identity resolution.
//!
//! Kotatsu backups name a manga's content provider with free text
//! ("MangaDex", "Asura Scans"); Mihon backups use the extension's 64-bit
//! numeric id. [`SourceRegistry`] maps between the two. It is built once,
//! never mutated afterward, and safe to share across concurrent conversions
//! by reference.
//!
//! Resolution precedence for names is an explicit, ordered list: exact match
//! on the normalized name, then substring match in declaration order, then
//! the reserved local id `"0"`. Reverse lookup falls back to an
//! `UNKNOWN_<id>` placeholder rather than an error so a converted backup
//! always carries *some* human-readable source label.

use std::collections::HashMap;

/// The reserved id for local/unresolvable sources.
pub const LOCAL_SOURCE_ID: &str = "0";

/// Known source names and their Mihon extension ids, in declaration order.
/// Multiple spellings of the same site share an id; the first spelling
/// declared for an id is the one reverse lookups produce.
const SOURCE_TABLE: &[(&str, &str)] = &[
    // English
    ("mangadex", "2499283573021220255"),
    ("mangadex (en)", "2499283573021220255"),
    ("manganato", "1024627298672457456"),
    ("mangakakalot", "3846770256925639136"),
    ("mangasee", "9"),
    ("mangasee123", "9"),
    ("mangalife", "9"),
    ("mangapark", "8254287141594575556"),
    ("mangapark v3", "8254287141594575556"),
    ("mangaplus", "1998944621602463790"),
    ("manga plus", "1998944621602463790"),
    ("webtoons", "1845182923275629188"),
    ("webtoon", "1845182923275629188"),
    ("comick", "5765891966456790523"),
    ("comick.fun", "5765891966456790523"),
    ("batoto", "1309193200845035910"),
    ("bato", "1309193200845035910"),
    ("bato.to", "1309193200845035910"),
    // Scanlator sites
    ("asurascans", "2553637714107023673"),
    ("asura scans", "2553637714107023673"),
    ("asura", "2553637714107023673"),
    ("reaperscans", "188497029855967603"),
    ("reaper scans", "188497029855967603"),
    ("flamescans", "8761790328498522074"),
    ("flame scans", "8761790328498522074"),
    ("flamecomics", "8761790328498522074"),
    ("luminousscans", "7706177082439987755"),
    ("luminous scans", "7706177082439987755"),
    ("alphascans", "7546756490325966047"),
    ("alpha scans", "7546756490325966047"),
    ("voidscans", "8247065093786800725"),
    ("void scans", "8247065093786800725"),
    ("nightscans", "4509655996247443912"),
    // Aggregators
    ("readm", "6543234632498168544"),
    ("readmanga", "6543234632498168544"),
    ("mangahere", "6884673034175326498"),
    ("mangafox", "6884673034175326498"),
    ("mangareader", "8076783582632021587"),
    ("mangapill", "8076783582632021531"),
    ("mangabuddy", "2538700039992853512"),
    ("mangatx", "3908282244132481792"),
    ("manhuaplus", "7530287748450684184"),
    ("1stkissmanga", "2721247987442232157"),
    ("kissmanga", "4955866890569858952"),
    // Spanish
    ("tmofans", "6840633575263395267"),
    ("tumangaonline", "6840633575263395267"),
    ("tu manga online", "6840633575263395267"),
    ("lectortmo", "6840633575263395267"),
    ("mangasin", "4064709858673115067"),
    ("inmanga", "6965218235655802377"),
    // French
    ("mangalib", "5714610692227829831"),
    ("japscan", "1908802013916934156"),
    ("sushi-scan", "7534436782915393377"),
    ("scantrad", "4264224553264275714"),
    // Russian
    ("remanga", "8033579885549490547"),
    ("readmanga.live", "8033579885549490547"),
    ("mangalib.me", "5714610692227829831"),
    // Japanese
    ("rawkuma", "1839226880348126720"),
    ("raw-manga", "1839226880348126720"),
    // Korean (manhwa)
    ("toonily", "6294577055953029822"),
    ("manhwa18", "2016038381909498697"),
    ("manhwatop", "8034989885549490544"),
    ("manytoon", "3539019969854829131"),
    // Chinese (manhua)
    ("manhuafast", "7530287748450684444"),
    ("manhuaga", "6178928928441088567"),
    // NSFW
    ("nhentai", "7309587263682593705"),
    ("nhentai.net", "7309587263682593705"),
    ("hentai2read", "1147788850338020"),
    ("e-hentai", "8803127450021473025"),
    ("pururin", "5199602181685553409"),
    // Portuguese
    ("mangalivre", "1808054561602432821"),
    ("manga livre", "1808054561602432821"),
    ("unionmangas", "380034878545898019"),
    // Indonesian
    ("komikindo", "6927605517028511574"),
    ("komiku", "5119602181685553408"),
    ("maidmanga", "3427285214399817467"),
    ("mangaindo", "6927605517028511573"),
    // Arabic
    ("mangaae", "3270616857158279808"),
    ("azoramanga", "7346812700127449620"),
    // Turkish
    ("mangadenizi", "5427285214399817468"),
    ("turktoon", "3427285214399817469"),
    // Vietnamese
    ("nettruyen", "2761192643234155643"),
    ("truyenqq", "1998944621602463792"),
];

/// Immutable bidirectional map between source names and numeric ids.
#[derive(Debug)]
pub struct SourceRegistry {
    /// (normalized name, id) pairs in declaration order, for substring scans.
    entries: Vec<(String, &'static str)>,
    /// Normalized name -> id, first declaration wins.
    by_name: HashMap<String, &'static str>,
    /// Id -> original name, first declaration wins.
    by_id: HashMap<&'static str, &'static str>,
}

impl SourceRegistry {
    /// Build the registry from the embedded source table.
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(SOURCE_TABLE.len());
        let mut by_name = HashMap::new();
        let mut by_id = HashMap::new();

        for &(name, id) in SOURCE_TABLE {
            let key = normalize(name);
            by_name.entry(key.clone()).or_insert(id);
            by_id.entry(id).or_insert(name);
            entries.push((key, id));
        }

        Self {
            entries,
            by_name,
            by_id,
        }
    }

    /// Resolve a free-text source name to its numeric id.
    ///
    /// Precedence: exact normalized match, then first substring match in
    /// declaration order (either direction), then [`LOCAL_SOURCE_ID`].
    pub fn resolve_id(&self, name: &str) -> &str {
        let normalized = normalize(name);
        // "LOCAL" is the reserved label resolve_name produces for the local
        // id, not an unresolved name.
        if normalized.is_empty() || normalized == "local" {
            return LOCAL_SOURCE_ID;
        }

        if let Some(id) = self.by_name.get(&normalized) {
            return id;
        }

        for (key, id) in &self.entries {
            if normalized.contains(key.as_str()) || key.contains(&normalized) {
                return id;
            }
        }

        LOCAL_SOURCE_ID
    }

    /// Resolve a numeric id back to a source name.
    ///
    /// Unknown ids produce an `UNKNOWN_<id>` placeholder; the reserved local
    /// id produces `LOCAL`.
    pub fn resolve_name(&self, id: &str) -> String {
        if id.is_empty() || id == LOCAL_SOURCE_ID {
            return "LOCAL".to_string();
        }
        match self.by_id.get(id) {
            Some(name) => (*name).to_string(),
            None => format!("UNKNOWN_{id}"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase and strip everything but ASCII alphanumerics.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
