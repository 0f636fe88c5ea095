//! Registry index and tiered address resolution.
//!
//! [`Resolver`] owns a three-level [`AddressIndex`] built once from the
//! postal registry and answers lookups in three phases: exact variant and
//! block-range match, prefix/substring/reverse-prefix fallback, and the
//! city's catch-all entries.
//!
//! Memory Layout:
//! - Prefecture, city and district maps are insertion ordered, so every
//!   scan visits keys in registry order
//! - District keys keep their range, lot and remainder qualifiers; all
//!   other parenthesized notes are stripped at build time
//!
//! Threading:
//! - [`Resolver`] is `Send + Sync`. Lookups take `&self` and allocate only
//!   per-query scratch strings, so one instance can serve many threads.

mod api;
mod builder;
pub mod qualifier;
mod search;
mod stats;
mod types;

pub use stats::IndexStats;
pub use types::{
    AddressIndex, CityMap, DistrictMap, FxIndexMap, Resolver, FALLBACK_STRATEGIES,
    GENERIC_DISTRICT_LABELS,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use yubin_types::{
        AddressError, MatchPhase, RegistryConfig, RegistryEncoding, RegistryError,
    };

    const ROWS: &[(&str, &str, &str, &str)] = &[
        ("1060032", "東京都", "港区", "六本木（次のビルを除く）"),
        ("1066090", "東京都", "港区", "六本木（地階・階層不明）"),
        ("1066090", "東京都", "港区", "六本木六本木ヒルズ森タワー（地階・階層不明）"),
        ("1070052", "東京都", "港区", "赤坂"),
        ("1050000", "東京都", "港区", "以下に掲載がない場合"),
        ("1010052", "東京都", "千代田区", "神田小川町"),
        ("1000005", "東京都", "千代田区", "丸の内"),
        ("0600001", "北海道", "札幌市中央区", "北一条西"),
        ("0600004", "北海道", "札幌市中央区", "北四条西（１〜１９丁目）"),
        ("0640824", "北海道", "札幌市中央区", "北四条西（２０〜３０丁目）"),
        ("0711502", "北海道", "上川郡東神楽町", "東三線"),
        ("0691406", "北海道", "石狩郡新篠津村", "あけぼの"),
        ("9496361", "新潟県", "十日町市", "脇川新田町（９７０番地）"),
        ("9496362", "新潟県", "十日町市", "脇川新田町（その他）"),
        ("9012300", "沖縄県", "中頭郡北中城村", "以下に掲載がない場合"),
        ("5300001", "大阪府", "大阪市北区", "梅田"),
    ];

    fn registry_line(code: &str, pref: &str, city: &str, district: &str) -> String {
        format!(
            "00000,\"{}  \",\"{code}\",\"\",\"\",\"\",\"{pref}\",\"{city}\",\"{district}\",0,0,0,0,0,0",
            &code[..3]
        )
    }

    fn registry_text(rows: &[(&str, &str, &str, &str)]) -> String {
        let mut lines: Vec<String> = rows
            .iter()
            .map(|&(code, pref, city, district)| registry_line(code, pref, city, district))
            .collect();
        lines.push("malformed".to_string());
        lines.join("\r\n")
    }

    fn resolver() -> Resolver {
        Resolver::from_registry_str(&registry_text(ROWS))
    }

    fn code(r: &Resolver, address: &str) -> Option<String> {
        r.resolve(address)
            .expect("well-formed address")
            .map(|c| c.to_string())
    }

    #[test]
    fn building_and_lot_suffixes_are_ignored() {
        let r = resolver();
        let input = "東京都港区六本木５丁目１−２−３ヒルズタワー";
        assert_eq!(r.normalize(input).unwrap(), "東京都港区六本木5丁目");
        assert_eq!(code(&r, input).as_deref(), Some("1060032"));
    }

    #[test]
    fn chome_falls_back_to_base_district() {
        let r = resolver();
        assert_eq!(code(&r, "東京都港区六本木1丁目").as_deref(), Some("1060032"));
        assert_eq!(code(&r, "東京都港区赤坂9-7-1 ミッドタウン・タワー").as_deref(), Some("1070052"));
    }

    #[test]
    fn full_width_input() {
        let r = resolver();
        assert_eq!(code(&r, "東京都千代田区神田小川町３－２２－１６").as_deref(), Some("1010052"));
        assert_eq!(code(&r, "　東京都港区赤坂９－７－１　").as_deref(), Some("1070052"));
    }

    #[test]
    fn unknown_addresses_are_absent() {
        let r = resolver();
        assert_eq!(code(&r, "東京都千代田区存在しない町"), None);
        assert_eq!(code(&r, "大阪府堺市堺区南瓦町"), None);
        assert_eq!(code(&r, "どこでもない場所"), None);
    }

    #[test]
    fn empty_input_is_invalid() {
        let r = resolver();
        assert_eq!(r.resolve(""), Err(AddressError::InvalidInput));
        assert_eq!(r.resolve(" \t "), Err(AddressError::InvalidInput));
        assert_eq!(r.normalize(""), Err(AddressError::InvalidInput));
    }

    #[test]
    fn city_only_uses_generic_entry_if_present() {
        let r = resolver();
        assert_eq!(code(&r, "東京都港区").as_deref(), Some("1050000"));
        assert_eq!(code(&r, "東京都千代田区"), None);
    }

    #[test]
    fn index_structure() {
        let r = resolver();
        let index = r.index();
        assert_eq!(index.prefecture_count(), 5);
        assert_eq!(index.city_count(), 8);
        assert_eq!(index.district_count(), 15);
        assert!(index.contains_prefecture("北海道"));
        assert!(index.contains_city("北海道", "上川郡東神楽町"));
        assert!(!index.contains_city("北海道", "札幌市北区"));
        assert!(!index.is_empty());

        let keys: Vec<&str> = index
            .districts("東京都", "港区")
            .expect("city")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            ["六本木", "六本木六本木ヒルズ森タワー", "赤坂", "以下に掲載がない場合"]
        );
    }

    #[test]
    fn first_seen_code_wins() {
        let r = resolver();
        assert_eq!(
            r.index().get("東京都", "港区", "六本木").map(|c| c.to_string()).as_deref(),
            Some("1060032")
        );
    }

    #[test]
    fn grid_addresses() {
        let r = resolver();
        assert_eq!(code(&r, "北海道札幌市中央区北1条西2丁目").as_deref(), Some("0600001"));
        assert_eq!(code(&r, "北海道札幌市中央区北一条西二丁目").as_deref(), Some("0600001"));
    }

    #[test]
    fn county_towns_and_villages() {
        let r = resolver();
        assert_eq!(code(&r, "北海道上川郡東神楽町東三線").as_deref(), Some("0711502"));
        assert_eq!(code(&r, "北海道石狩郡新篠津村あけぼの").as_deref(), Some("0691406"));
    }

    #[test]
    fn chome_ranges() {
        let r = resolver();
        for block in [1, 5, 19] {
            let address = format!("北海道札幌市中央区北4条西{block}丁目");
            assert_eq!(code(&r, &address).as_deref(), Some("0600004"), "{address}");
        }
        for block in [20, 22, 30] {
            let address = format!("北海道札幌市中央区北4条西{block}丁目");
            assert_eq!(code(&r, &address).as_deref(), Some("0640824"), "{address}");
        }
    }

    #[test]
    fn chome_ranges_in_other_scripts() {
        let r = resolver();
        assert_eq!(code(&r, "北海道札幌市中央区北４条西２２丁目").as_deref(), Some("0640824"));
        assert_eq!(code(&r, "北海道札幌市中央区北四条西五丁目").as_deref(), Some("0600004"));
        assert_eq!(code(&r, "北海道札幌市中央区北四条西三十丁目").as_deref(), Some("0640824"));
    }

    #[test]
    fn specific_lot_versus_remainder() {
        let r = resolver();
        assert_eq!(code(&r, "新潟県十日町市脇川新田町970番地").as_deref(), Some("9496361"));
        assert_eq!(code(&r, "新潟県十日町市脇川新田町９７０番地").as_deref(), Some("9496361"));
        assert_eq!(code(&r, "新潟県十日町市脇川新田町南割下").as_deref(), Some("9496362"));
        assert_eq!(code(&r, "新潟県十日町市脇川新田町").as_deref(), Some("9496362"));
    }

    #[test]
    fn generic_fallback() {
        let r = resolver();
        assert_eq!(code(&r, "沖縄県中頭郡北中城村石平1951").as_deref(), Some("9012300"));
    }

    #[test]
    fn detailed_resolution_reports_phase() {
        let r = resolver();

        let exact = r.resolve_detailed("東京都港区六本木５丁目").unwrap().unwrap();
        assert_eq!(exact.phase, MatchPhase::Exact);
        assert_eq!(exact.matched_district, "六本木");
        assert_eq!(exact.normalized, "東京都港区六本木5丁目");
        assert_eq!(exact.postal_code, "1060032");

        let range = r.resolve_detailed("北海道札幌市中央区北4条西22丁目").unwrap().unwrap();
        assert_eq!(range.phase, MatchPhase::ChomeRange);
        assert_eq!(range.matched_district, "北四条西（２０〜３０丁目）");

        let lot = r.resolve_detailed("新潟県十日町市脇川新田町970番地").unwrap().unwrap();
        assert_eq!(lot.phase, MatchPhase::Prefix);
        assert_eq!(lot.matched_district, "脇川新田町（９７０番地）");

        let generic = r.resolve_detailed("沖縄県中頭郡北中城村石平1951").unwrap().unwrap();
        assert_eq!(generic.phase, MatchPhase::Generic);
        assert_eq!(generic.matched_district, "以下に掲載がない場合");

        assert_eq!(r.resolve_detailed("東京都千代田区存在しない町").unwrap(), None);
    }

    #[test]
    fn parse_address_delegates_to_segmenter() {
        let r = resolver();
        let parts = r.parse_address("大阪府大阪市北区梅田1丁目").unwrap();
        assert_eq!(parts.prefecture, "大阪府");
        assert_eq!(parts.city, "大阪市北区");
        assert_eq!(parts.district, "梅田1丁目");
        assert!(matches!(
            r.parse_address("梅田"),
            Err(AddressError::Segmentation { .. })
        ));
    }

    #[test]
    fn stats_summary() {
        let stats = resolver().stats();
        assert_eq!(stats.prefectures, 5);
        assert_eq!(stats.cities, 8);
        assert_eq!(stats.districts, 15);
        assert_eq!(stats.rows_read, 17);
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.duplicates_ignored, 1);
        assert_eq!(stats.rows_indexed(), 15);
        assert_eq!(
            stats.to_string(),
            "5 prefectures, 8 cities, 15 districts from 17 rows (1 skipped, 1 duplicates)"
        );
    }

    #[test]
    fn build_from_utf8_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}{}", registry_text(ROWS)).unwrap();

        let r = Resolver::build(file.path()).unwrap();
        assert_eq!(r.index().district_count(), 15);
        assert_eq!(code(&r, "東京都港区赤坂").as_deref(), Some("1070052"));
    }

    #[test]
    fn build_from_shift_jis_file() {
        // Shift_JIS 0x8160 round-trips as U+FF5E, not the U+301C wave dash.
        let text = registry_text(&ROWS[..10]).replace('〜', "～");
        let (encoded, _, had_errors) = encoding_rs::SHIFT_JIS.encode(&text);
        assert!(!had_errors);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&encoded).unwrap();

        let r = Resolver::build_with_config(file.path(), RegistryConfig::shift_jis()).unwrap();
        assert_eq!(code(&r, "北海道札幌市中央区北4条西5丁目").as_deref(), Some("0600004"));
        assert_eq!(code(&r, "北海道札幌市中央区北4条西22丁目").as_deref(), Some("0640824"));
        assert_eq!(code(&r, "東京都港区六本木").as_deref(), Some("1060032"));
        assert!(r
            .index()
            .districts("北海道", "札幌市中央区")
            .expect("city")
            .contains_key("北四条西（１～１９丁目）"));

        let err = Resolver::build(file.path()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Encoding {
                encoding: RegistryEncoding::Utf8,
                ..
            }
        ));
    }

    #[test]
    fn missing_registry_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Resolver::build(dir.path().join("ken_all.csv")).unwrap_err();
        assert!(matches!(err, RegistryError::SourceNotFound { .. }));
    }

    #[test]
    fn resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver>();

        let r = Arc::new(resolver());
        std::thread::scope(|s| {
            for _ in 0..4 {
                let r = Arc::clone(&r);
                s.spawn(move || {
                    assert_eq!(code(&r, "東京都港区六本木").as_deref(), Some("1060032"));
                });
            }
        });
    }
}
