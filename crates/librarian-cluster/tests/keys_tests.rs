use librarian_cluster::{FreenetKeys, PresentationOptions, ResultClusterer, ResultsLayout, Version};
use librarian_core::diagnostics::Diagnostics;
use librarian_core::traits::UriCanonicalizer;
use librarian_core::types::RawEntry;

const KEY: &str = "abcdefghijklmnop,qrstuv-wxyz~0123,AQACAAE";

#[test]
fn ssk_edition_alias() {
    let parsed = FreenetKeys.parse(&format!("freenet:SSK@{}/mysite-7/docs/index.html", KEY)).expect("parse");
    assert_eq!(parsed.uri, format!("SSK@{}/mysite-7/docs/index.html", KEY));
    assert!(parsed.is_alias());
    assert_eq!(parsed.edition, Some(7));
    assert_eq!(parsed.edition_uri.as_deref(), Some(format!("USK@{}/mysite/7/docs/index.html", KEY).as_str()));
    assert_eq!(parsed.site_identity, format!("USK@{}/mysite", KEY));
}

#[test]
fn usk_and_plain_ssk_are_unversioned() {
    let usk = FreenetKeys.parse(&format!("/USK@{}/mysite/12/page", KEY)).expect("usk");
    assert!(!usk.is_alias());
    assert_eq!(usk.edition, None);
    assert_eq!(usk.site_identity, format!("USK@{}/mysite", KEY));

    let ssk = FreenetKeys.parse(&format!("ssk@{}/about/", KEY)).expect("ssk");
    assert_eq!(ssk.uri, format!("SSK@{}/about", KEY));
    assert_eq!(ssk.site_identity, format!("SSK@{}/about", KEY));
    assert!(!ssk.is_alias());

    let ksk = FreenetKeys.parse("KSK@gpl.txt").expect("ksk");
    assert_eq!(ksk.site_identity, "KSK@gpl.txt");
}

#[test]
fn malformed_keys_are_errors() {
    let usk_without_edition = format!("USK@{}/site", KEY);
    let usk_bad_edition = format!("USK@{}/site/latest", KEY);
    let cases: [&str; 10] = [
        "",
        "http://example.com",
        "XYZ@abc,def,ghi/x",
        "SSK@onlyone/site",
        "SSK@a,b/site",
        "SSK@a,b,c",
        &usk_without_edition,
        &usk_bad_edition,
        "KSK@",
        "CHK@a b,c,d/file",
    ];
    for bad in cases {
        assert!(FreenetKeys.parse(bad).is_err(), "expected '{}' to be malformed", bad);
    }
}

#[test]
fn display_form_shortens_routing_key() {
    let parsed = FreenetKeys.parse(&format!("SSK@{}/mysite-7/index.html", KEY)).expect("parse");
    assert_eq!(FreenetKeys.display_form(&parsed), "SSK@abcdefgh.../mysite-7/index.html");
    let ksk = FreenetKeys.parse("KSK@gpl.txt").expect("ksk");
    assert_eq!(FreenetKeys.display_form(&ksk), "KSK@gpl.txt");
}

#[test]
fn freenet_results_cluster_by_site() {
    let results = vec![
        RawEntry::new(format!("USK@{}/mysite/0/page1", KEY), "unversioned"),
        RawEntry::new(format!("SSK@{}/mysite-3/page2", KEY), "three"),
        RawEntry::new("not a key", "broken"),
        RawEntry::new(format!("SSK@{}/mysite-1/page3", KEY), ""),
        RawEntry::new(format!("CHK@{}/file.txt", KEY), "a file"),
    ];
    let mut diag = Diagnostics::new();
    let tree = ResultClusterer::new(&FreenetKeys).cluster(results, &mut diag);
    assert_eq!(diag.malformed_count(), 1);
    assert_eq!(tree.site_count(), 2);
    let versions = tree.site(&format!("USK@{}/mysite", KEY)).expect("site");
    assert_eq!(versions.keys().copied().collect::<Vec<_>>(), vec![Version::Unversioned, Version::Edition(1), Version::Edition(3)]);

    let layout = ResultsLayout::build(&tree, &FreenetKeys, &PresentationOptions::default());
    assert_eq!(layout.total_count, 4);
    assert_eq!(layout.sites[0].heading, "file.txt", "CHK sorts before USK");
    let site = &layout.sites[1];
    assert_eq!(site.heading, "mysite");
    assert_eq!(site.newest.heading.as_ref().map(|h| h.label.as_str()), Some("mysite-3"));
    let untitled = &site.older.as_ref().expect("older").versions[1].entries[0];
    assert_eq!(untitled.title, "SSK@abcdefgh.../mysite-1/page3");
    assert_eq!(untitled.edition_href, Some(format!("/USK@{}/mysite/1/page3", KEY)));
}
