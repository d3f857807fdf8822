use super::*;

fn movie(id: i64, title: &str, year: i32) -> MovieRecord {
    MovieRecord::new(id, title, year)
}

fn with_runtime(id: i64, runtime: &str) -> MovieRecord {
    let mut m = movie(id, &format!("Runtime {}", id), 2000);
    m.runtime = Some(runtime.to_string());
    m
}

fn ids(movies: &[MovieRecord]) -> Vec<i64> {
    movies.iter().map(|m| m.id).collect()
}

fn sample_collection() -> Vec<MovieRecord> {
    let mut heat = movie(4, "Heat", 1995);
    heat.genre = "Crime".to_string();
    heat.description = "A group of professional bank robbers".to_string();
    heat.rating = 8.3;
    heat.runtime = Some("170 min".to_string());
    heat.tags = vec!["rewatch".to_string()];
    heat.user_rating = Some(5);
    heat.community_rating = Some(4.5);

    let mut alien = movie(2, "Alien", 1979);
    alien.genre = "Horror".to_string();
    alien.description = "In space no one can hear you scream".to_string();
    alien.rating = 8.5;
    alien.imdb_rating = Some(8.4);
    alien.runtime = Some("117 min".to_string());
    alien.tags = vec!["classic".to_string(), "rewatch".to_string()];
    alien.user_rating = Some(4);

    let mut dark = movie(7, "Dark", 2017);
    dark.genre = "Mystery".to_string();
    dark.description = "A missing child sets four families on a frantic hunt".to_string();
    dark.rating = 8.7;
    dark.runtime = Some("3 Seasons".to_string());
    dark.community_rating = Some(3.9);

    let mut short = movie(1, "la jetée", 1962);
    short.genre = "Sci-Fi".to_string();
    short.description = "A photo-roman about time travel".to_string();
    short.rating = 8.2;
    short.runtime = Some("28 min".to_string());
    short.tags = vec!["classic".to_string()];

    let mut fleabag = movie(9, "Fleabag", 2016);
    fleabag.genre = "Comedy".to_string();
    fleabag.description = "A dry-witted woman navigates life in London".to_string();
    fleabag.rating = 8.7;
    fleabag.runtime = Some("2 Seasons".to_string());

    vec![heat, alien, dark, short, fleabag]
}

fn unpaged(params: &ViewParams) -> ViewParams {
    ViewParams {
        page: 1,
        page_size: usize::MAX,
        ..params.clone()
    }
}

#[test]
fn test_default_params_return_everything_newest_first() {
    let view = compute_view(&sample_collection(), &ViewParams::default());
    assert_eq!(ids(&view.movies), vec![9, 7, 4, 2, 1]);
    assert_eq!(view.total, 5);
    assert_eq!(view.page_count, 1);
}

#[test]
fn test_view_is_subset_without_duplicates() {
    let collection = sample_collection();
    let param_sets = vec![
        ViewParams::default(),
        ViewParams {
            search_query: "a".to_string(),
            sort_by: SortKey::Title,
            ..ViewParams::default()
        },
        ViewParams {
            selected_tags: ["rewatch".to_string()].into_iter().collect(),
            sort_by: SortKey::UserRating,
            ..ViewParams::default()
        },
        ViewParams {
            imdb_rating_range: (8.4, 8.7),
            sort_by: SortKey::CommunityRating,
            page_size: 2,
            ..ViewParams::default()
        },
    ];

    for params in param_sets {
        let view = compute_view(&collection, &params);
        let mut seen = std::collections::HashSet::new();
        for m in &view.movies {
            assert!(collection.contains(m), "view fabricated record {}", m.id);
            assert!(seen.insert(m.id), "view duplicated record {}", m.id);
        }
    }
}

#[test]
fn test_filtering_is_idempotent() {
    let collection = sample_collection();
    let params = ViewParams {
        selected_tags: ["classic".to_string()].into_iter().collect(),
        imdb_rating_range: (8.0, 9.0),
        sort_by: SortKey::Year,
        ..ViewParams::default()
    };

    let once = filter_and_sort(&collection, &params);
    let twice = filter_and_sort(&once, &params);
    assert_eq!(once, twice);
    assert_eq!(ids(&once), vec![2, 1]);
}

#[test]
fn test_date_added_sort_uses_id_descending() {
    let collection = vec![movie(5, "E", 2000), movie(1, "A", 2000), movie(3, "C", 2000)];
    let view = compute_view(&collection, &ViewParams::default());
    assert_eq!(ids(&view.movies), vec![5, 3, 1]);

    let params = ViewParams {
        sort_by: SortKey::DateAddedLatest,
        ..ViewParams::default()
    };
    assert_eq!(ids(&compute_view(&collection, &params).movies), vec![1, 3, 5]);
}

#[test]
fn test_date_added_sort_ignores_timestamp() {
    let mut older_id = movie(1, "A", 2000);
    older_id.date_added = Some(2_000_000_000_000);
    let mut newer_id = movie(2, "B", 2000);
    newer_id.date_added = Some(1_000_000_000_000);

    let view = compute_view(&[older_id, newer_id], &ViewParams::default());
    assert_eq!(ids(&view.movies), vec![2, 1]);
}

#[test]
fn test_sorts_are_stable_on_ties() {
    // All share year, rating, user rating and community rating.
    let collection: Vec<MovieRecord> = [3, 1, 2].iter().map(|id| movie(*id, "Same", 2000)).collect();

    for key in [
        SortKey::Year,
        SortKey::ImdbRating,
        SortKey::UserRating,
        SortKey::CommunityRating,
        SortKey::Title,
    ] {
        let params = ViewParams {
            sort_by: key,
            ..ViewParams::default()
        };
        assert_eq!(ids(&filter_and_sort(&collection, &params)), vec![3, 1, 2], "{} not stable", key);
    }
}

#[test]
fn test_title_sort_is_case_insensitive() {
    let params = ViewParams {
        sort_by: SortKey::Title,
        ..ViewParams::default()
    };
    let sorted = filter_and_sort(&sample_collection(), &params);
    let titles: Vec<&str> = sorted.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Dark", "Fleabag", "Heat", "la jetée"]);
}

#[test]
fn test_title_sort_folds_accents() {
    let collection = vec![movie(1, "Zorro", 1998), movie(2, "Éclair", 2001), movie(3, "Amélie", 2001), movie(4, "eclair", 1990)];
    let params = ViewParams {
        sort_by: SortKey::Title,
        ..ViewParams::default()
    };
    let sorted = filter_and_sort(&collection, &params);
    let titles: Vec<&str> = sorted.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Amélie", "eclair", "Éclair", "Zorro"]);
}

#[test]
fn test_rating_sorts_descending_with_fallbacks() {
    let collection = sample_collection();

    let by_imdb = filter_and_sort(
        &collection,
        &ViewParams {
            sort_by: SortKey::ImdbRating,
            ..ViewParams::default()
        },
    );
    // Dark and Fleabag tie at 8.7 and keep their collection order.
    assert_eq!(ids(&by_imdb), vec![7, 9, 2, 4, 1]);

    let by_user = filter_and_sort(
        &collection,
        &ViewParams {
            sort_by: SortKey::UserRating,
            ..ViewParams::default()
        },
    );
    assert_eq!(ids(&by_user), vec![4, 2, 7, 1, 9]);

    let by_community = filter_and_sort(
        &collection,
        &ViewParams {
            sort_by: SortKey::CommunityRating,
            ..ViewParams::default()
        },
    );
    assert_eq!(ids(&by_community), vec![4, 7, 2, 1, 9]);

    let by_year = filter_and_sort(
        &collection,
        &ViewParams {
            sort_by: SortKey::Year,
            ..ViewParams::default()
        },
    );
    assert_eq!(ids(&by_year), vec![7, 9, 4, 2, 1]);
}

#[test]
fn test_pages_cover_sequence_exactly_once() {
    let collection: Vec<MovieRecord> = (1..=31).map(|id| movie(id, &format!("T{}", id), 2000)).collect();
    let base = ViewParams {
        page_size: 12,
        ..ViewParams::default()
    };
    let full = filter_and_sort(&collection, &base);

    let first = compute_view(&collection, &base);
    assert_eq!(first.page_count, 3);

    let mut concatenated = Vec::new();
    for page in 1..=first.page_count {
        let params = ViewParams { page, ..base.clone() };
        let view = compute_view(&collection, &params);
        assert!(view.movies.len() <= 12);
        concatenated.extend(view.movies);
    }
    assert_eq!(concatenated, full);
}

#[test]
fn test_both_page_sizes() {
    let collection: Vec<MovieRecord> = (1..=30).map(|id| movie(id, "T", 2000)).collect();
    let compact = ViewParams {
        page_size: 12,
        ..ViewParams::default()
    };
    let wide = ViewParams {
        page_size: 15,
        ..ViewParams::default()
    };
    assert_eq!(compute_view(&collection, &compact).page_count, 3);
    assert_eq!(compute_view(&collection, &wide).page_count, 2);
}

#[test]
fn test_out_of_range_page_is_empty_not_clamped() {
    let collection = sample_collection();
    for page in [0, 2, 99] {
        let params = ViewParams {
            page,
            ..ViewParams::default()
        };
        let view = compute_view(&collection, &params);
        assert!(view.movies.is_empty(), "page {} should be empty", page);
        assert_eq!(view.total, 5);
        assert_eq!(view.page_count, 1);
        assert_eq!(view.page, page);
    }
}

#[test]
fn test_zero_page_size_has_no_pages() {
    let params = ViewParams {
        page_size: 0,
        ..ViewParams::default()
    };
    let view = compute_view(&sample_collection(), &params);
    assert_eq!(view.page_count, 0);
    assert!(view.movies.is_empty());
}

#[test]
fn test_empty_collection() {
    let view = compute_view(&[], &ViewParams::default());
    assert!(view.movies.is_empty());
    assert_eq!(view.page_count, 0);
    assert_eq!(view.total, 0);
}

#[test]
fn test_genre_requires_exact_field_match() {
    let mut combo = movie(1, "Combo", 2000);
    combo.genre = "Crime, Drama".to_string();
    let mut crime = movie(2, "Crime only", 2000);
    crime.genre = "Crime".to_string();

    let params = ViewParams {
        selected_genres: ["Crime".to_string()].into_iter().collect(),
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&[combo.clone(), crime.clone()], &params)), vec![2]);

    let params = ViewParams {
        selected_genres: ["Crime".to_string(), "Crime, Drama".to_string()].into_iter().collect(),
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&[combo, crime], &params)), vec![2, 1]);
}

#[test]
fn test_year_filter() {
    let params = ViewParams {
        selected_years: [1995, 2017].into_iter().collect(),
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&sample_collection(), &params)), vec![7, 4]);
}

#[test]
fn test_search_matches_title_or_description_case_insensitively() {
    let collection = sample_collection();

    let params = ViewParams {
        search_query: "HEAT".to_string(),
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&collection, &params)), vec![4]);

    let params = ViewParams {
        search_query: "scream".to_string(),
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&collection, &params)), vec![2]);

    let params = ViewParams {
        search_query: "nothing like this".to_string(),
        ..ViewParams::default()
    };
    assert!(filter_and_sort(&collection, &params).is_empty());
}

#[test]
fn test_rating_range_is_inclusive_and_prefers_imdb_rating() {
    let collection = sample_collection();

    // Alien has rating 8.5 but imdbRating 8.4.
    let params = ViewParams {
        imdb_rating_range: (8.4, 8.4),
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&collection, &params)), vec![2]);

    let params = ViewParams {
        imdb_rating_range: (8.5, 8.5),
        ..ViewParams::default()
    };
    assert!(filter_and_sort(&collection, &params).is_empty());

    let params = ViewParams {
        imdb_rating_range: (8.2, 8.3),
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&collection, &params)), vec![4, 1]);
}

#[test]
fn test_two_seasons_is_multi_season_only() {
    let m = with_runtime(1, "2 Seasons");
    assert!(runtime_matches(&m, RuntimeFilter::MultiSeason));
    assert!(!runtime_matches(&m, RuntimeFilter::OneSeason));
    assert!(!runtime_matches(&m, RuntimeFilter::Short));
    assert!(!runtime_matches(&m, RuntimeFilter::Medium));
    assert!(!runtime_matches(&m, RuntimeFilter::Long));
    assert!(runtime_matches(&m, RuntimeFilter::All));
}

#[test]
fn test_ninety_five_minutes_is_medium() {
    let m = with_runtime(1, "95 min");
    assert!(runtime_matches(&m, RuntimeFilter::Medium));
    assert!(!runtime_matches(&m, RuntimeFilter::Short));
    assert!(!runtime_matches(&m, RuntimeFilter::Long));
    assert!(!runtime_matches(&m, RuntimeFilter::OneSeason));
    assert!(!runtime_matches(&m, RuntimeFilter::MultiSeason));
}

#[test]
fn test_runtime_boundaries() {
    assert!(runtime_matches(&with_runtime(1, "90 min"), RuntimeFilter::Short));
    assert!(runtime_matches(&with_runtime(1, "91 min"), RuntimeFilter::Medium));
    assert!(runtime_matches(&with_runtime(1, "150 min"), RuntimeFilter::Medium));
    assert!(runtime_matches(&with_runtime(1, "151 min"), RuntimeFilter::Long));
    assert!(!runtime_matches(&with_runtime(1, "0 min"), RuntimeFilter::Short));

    let missing = movie(1, "No runtime", 2000);
    assert!(!runtime_matches(&missing, RuntimeFilter::Short));
    assert!(!runtime_matches(&missing, RuntimeFilter::Long));
    assert!(!runtime_matches(&missing, RuntimeFilter::OneSeason));
    assert!(runtime_matches(&missing, RuntimeFilter::All));
}

#[test]
fn test_one_season_spellings() {
    assert!(runtime_matches(&with_runtime(1, "1 Season"), RuntimeFilter::OneSeason));
    assert!(runtime_matches(&with_runtime(1, "1 Seasons"), RuntimeFilter::OneSeason));
    assert!(!runtime_matches(&with_runtime(1, "1 Season"), RuntimeFilter::MultiSeason));
    // Case-insensitive season detection, case-sensitive count.
    assert!(!runtime_matches(&with_runtime(1, "1 season"), RuntimeFilter::OneSeason));
}

#[test]
fn test_tag_filter_intersects() {
    let collection = sample_collection();
    let params = ViewParams {
        selected_tags: ["classic".to_string(), "unused".to_string()].into_iter().collect(),
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&collection, &params)), vec![2, 1]);
}

#[test]
fn test_predicates_are_anded() {
    let params = ViewParams {
        selected_tags: ["rewatch".to_string()].into_iter().collect(),
        runtime_filter: RuntimeFilter::Long,
        ..ViewParams::default()
    };
    assert_eq!(ids(&filter_and_sort(&sample_collection(), &params)), vec![4]);
}

#[test]
fn test_unpaged_view_equals_filter_and_sort() {
    let collection = sample_collection();
    let params = ViewParams {
        page_size: 2,
        page: 2,
        ..ViewParams::default()
    };
    let view = compute_view(&collection, &unpaged(&params));
    assert_eq!(view.movies, filter_and_sort(&collection, &params));
}

#[test]
fn test_parse_names() {
    assert_eq!("dateAdded".parse::<SortKey>().unwrap(), SortKey::DateAdded);
    assert_eq!("date-added-latest".parse::<SortKey>().unwrap(), SortKey::DateAddedLatest);
    assert_eq!("community_rating".parse::<SortKey>().unwrap(), SortKey::CommunityRating);
    assert!("popularity".parse::<SortKey>().is_err());

    assert_eq!("oneSeason".parse::<RuntimeFilter>().unwrap(), RuntimeFilter::OneSeason);
    assert_eq!("multi-season".parse::<RuntimeFilter>().unwrap(), RuntimeFilter::MultiSeason);
    assert!("epic".parse::<RuntimeFilter>().is_err());

    for key in SortKey::ALL {
        assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
    }
}

#[test]
fn test_oversized_season_count_is_multi_season() {
    let m = with_runtime(1, "123456789012345678901234 Seasons");
    assert!(runtime_matches(&m, RuntimeFilter::MultiSeason));
    assert!(!runtime_matches(&m, RuntimeFilter::Long));
}
