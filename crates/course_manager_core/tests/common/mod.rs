#![allow(dead_code)]

use course_manager_core::{
    Author, AuthorId, AuthorRepository, AuthorValidationError, ConstraintViolation,
    ContextAuthorRepository, ContextBuilder, Country, NewAuthor, RepoError, StoreError,
};
use uuid::Uuid;

pub const NEW_AUTHOR_ID: &str = "ae9118fd-4ffd-4895-a756-c371f656eeed";

pub fn new_author_id() -> AuthorId {
    Uuid::parse_str(NEW_AUTHOR_ID).unwrap()
}

/// Seeds BE/US and the five reference authors in insertion order.
pub fn seed_catalog<B: ContextBuilder>(builder: &B) -> Vec<AuthorId> {
    let mut context = builder.build_context().unwrap();
    context.add_country(Country::new("BE", "Belgium")).unwrap();
    context
        .add_country(Country::new("US", "United States of America"))
        .unwrap();

    let ids = [
        ("Kevin", "Dockx", "BE"),
        ("Gill", "Cleeren", "BE"),
        ("Julie", "Lerman", "US"),
        ("Shawn", "Wildermuth", "BE"),
        ("Deborah", "Kurata", "US"),
    ]
    .into_iter()
    .map(|(first, last, country)| {
        context
            .add_author(Author::new(Some(first), last, country))
            .unwrap()
    })
    .collect();

    assert_eq!(context.save_changes().unwrap(), 7);
    ids
}

pub fn seed_belgium<B: ContextBuilder>(builder: &B) {
    let mut context = builder.build_context().unwrap();
    context.add_country(Country::new("BE", "Belgium")).unwrap();
    context.save_changes().unwrap();
}

fn last_names(authors: &[Author]) -> Vec<&str> {
    authors.iter().map(|author| author.last_name.as_str()).collect()
}

pub fn get_authors_second_page_returns_second_page<B: ContextBuilder>(builder: B) {
    seed_catalog(&builder);

    let mut context = builder.build_context().unwrap();
    let target = ContextAuthorRepository::new(&mut context);
    let result = target.get_authors(2, 3).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(last_names(&result), vec!["Wildermuth", "Kurata"]);
}

pub fn get_authors_page_lengths_follow_total<B: ContextBuilder>(builder: B) {
    seed_catalog(&builder);
    let total: u64 = 5;

    let mut context = builder.build_context().unwrap();
    let target = ContextAuthorRepository::new(&mut context);
    let all = target.get_all_authors().unwrap();

    for page_size in 1..=6u32 {
        for page_number in 1..=7u32 {
            let skipped = u64::from(page_number - 1) * u64::from(page_size);
            let expected = total.saturating_sub(skipped).min(u64::from(page_size)) as usize;

            let page = target.get_authors(page_number, page_size).unwrap();
            assert_eq!(page.len(), expected, "page {page_number} size {page_size}");

            let start = skipped as usize;
            if expected > 0 {
                assert_eq!(page.as_slice(), &all[start..start + expected]);
            }
        }
    }
}

pub fn get_authors_far_past_end_is_empty<B: ContextBuilder>(builder: B) {
    seed_catalog(&builder);

    let mut context = builder.build_context().unwrap();
    let target = ContextAuthorRepository::new(&mut context);

    assert!(target.get_authors(u32::MAX, u32::MAX).unwrap().is_empty());
    assert!(target.get_authors(3, 3).unwrap().is_empty());
}

pub fn get_authors_zero_arguments_are_invalid<B: ContextBuilder>(builder: B) {
    let mut context = builder.build_context().unwrap();
    let target = ContextAuthorRepository::new(&mut context);

    assert!(matches!(
        target.get_authors(0, 3),
        Err(RepoError::InvalidArgument {
            argument: "page_number",
            ..
        })
    ));
    assert!(matches!(
        target.get_authors(1, 0),
        Err(RepoError::InvalidArgument {
            argument: "page_size",
            ..
        })
    ));
}

pub fn get_author_nil_id_is_invalid_argument<B: ContextBuilder>(builder: B) {
    {
        let mut context = builder.build_context().unwrap();
        let target = ContextAuthorRepository::new(&mut context);
        assert!(matches!(
            target.get_author(Uuid::nil()),
            Err(RepoError::InvalidArgument { argument: "id", .. })
        ));
    }

    seed_catalog(&builder);

    let mut context = builder.build_context().unwrap();
    let target = ContextAuthorRepository::new(&mut context);
    assert!(matches!(
        target.get_author(Uuid::nil()),
        Err(RepoError::InvalidArgument { argument: "id", .. })
    ));
    assert!(matches!(
        target.author_exists(Uuid::nil()),
        Err(RepoError::InvalidArgument { argument: "id", .. })
    ));
}

pub fn get_author_unknown_id_returns_none<B: ContextBuilder>(builder: B) {
    seed_catalog(&builder);

    let mut context = builder.build_context().unwrap();
    let target = ContextAuthorRepository::new(&mut context);

    assert!(target.get_author(Uuid::new_v4()).unwrap().is_none());
    assert!(!target.author_exists(Uuid::new_v4()).unwrap());
}

pub fn get_author_is_idempotent<B: ContextBuilder>(builder: B) {
    let ids = seed_catalog(&builder);

    let mut context = builder.build_context().unwrap();
    let target = ContextAuthorRepository::new(&mut context);

    let first = target.get_author(ids[2]).unwrap().unwrap();
    let second = target.get_author(ids[2]).unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.last_name, "Lerman");
    assert_eq!(first.first_name.as_deref(), Some("Julie"));
    assert_eq!(first.country_id, "US");
}

pub fn add_author_without_country_defaults_to_be<B: ContextBuilder>(builder: B) {
    seed_belgium(&builder);

    {
        let mut context = builder.build_context().unwrap();
        let mut target = ContextAuthorRepository::new(&mut context);
        let id = target
            .add_author(
                NewAuthor::new("New Last Name")
                    .with_id(new_author_id())
                    .with_first_name("New First Name"),
            )
            .unwrap();
        assert_eq!(id, new_author_id());
        assert_eq!(target.save_changes().unwrap(), 1);
    }

    let mut context = builder.build_context().unwrap();
    {
        let target = ContextAuthorRepository::new(&mut context);
        let added = target.get_author(new_author_id()).unwrap().unwrap();
        assert_eq!(added.country_id, "BE");
    }
    let all = context.authors(&Default::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].country_id, "BE");
}

pub fn add_author_is_invisible_until_saved<B: ContextBuilder>(builder: B) {
    seed_belgium(&builder);

    let mut writer = builder.build_context().unwrap();
    let mut target = ContextAuthorRepository::new(&mut writer);
    let id = target.add_author(NewAuthor::new("Staged")).unwrap();
    assert!(target.get_author(id).unwrap().is_none());

    let reader = builder.build_context().unwrap();
    assert!(reader.find_author(id).unwrap().is_none());

    target.save_changes().unwrap();
    assert!(reader.find_author(id).unwrap().is_some());
}

pub fn add_author_blank_last_name_is_rejected<B: ContextBuilder>(builder: B) {
    let mut context = builder.build_context().unwrap();
    let mut target = ContextAuthorRepository::new(&mut context);

    let err = target.add_author(NewAuthor::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(AuthorValidationError::EmptyLastName)
    ));
    drop(target);
    assert!(!context.has_pending_changes());
}

pub fn save_changes_unknown_country_is_persistence_error<B: ContextBuilder>(builder: B) {
    seed_belgium(&builder);

    let mut context = builder.build_context().unwrap();
    let mut target = ContextAuthorRepository::new(&mut context);
    target
        .add_author(NewAuthor::new("Elsewhere").with_country("NL"))
        .unwrap();

    let err = target.save_changes().unwrap_err();
    assert!(matches!(
        err,
        RepoError::Store(StoreError::Constraint(ConstraintViolation::ForeignKey {
            table: "authors"
        }))
    ));
}

pub fn save_changes_failure_is_atomic<B: ContextBuilder>(builder: B) {
    seed_belgium(&builder);

    let mut context = builder.build_context().unwrap();
    {
        let mut target = ContextAuthorRepository::new(&mut context);
        target.add_author(NewAuthor::new("Valid")).unwrap();
        target
            .add_author(NewAuthor::new("Invalid").with_country("NL"))
            .unwrap();
        assert!(target.save_changes().is_err());
    }

    assert_eq!(context.pending_changes().authors.len(), 2);
    context.discard_changes();
    assert_eq!(context.save_changes().unwrap(), 0);

    let fresh = builder.build_context().unwrap();
    assert_eq!(fresh.count_authors().unwrap(), 0);
}

pub fn save_changes_duplicate_author_id_is_rejected<B: ContextBuilder>(builder: B) {
    seed_belgium(&builder);

    {
        let mut context = builder.build_context().unwrap();
        let mut target = ContextAuthorRepository::new(&mut context);
        target
            .add_author(NewAuthor::new("First").with_id(new_author_id()))
            .unwrap();
        target.save_changes().unwrap();
    }

    let mut context = builder.build_context().unwrap();
    let mut target = ContextAuthorRepository::new(&mut context);
    target
        .add_author(NewAuthor::new("Second").with_id(new_author_id()))
        .unwrap();
    let err = target.save_changes().unwrap_err();
    assert!(matches!(
        err,
        RepoError::Store(StoreError::Constraint(ConstraintViolation::DuplicateKey {
            table: "authors"
        }))
    ));

    let stored = target.get_author(new_author_id()).unwrap().unwrap();
    assert_eq!(stored.last_name, "First");
}

pub fn save_changes_duplicate_country_is_rejected<B: ContextBuilder>(builder: B) {
    seed_belgium(&builder);

    let mut context = builder.build_context().unwrap();
    context
        .add_country(Country::new("BE", "Belgium, again"))
        .unwrap();
    let err = context.save_changes().unwrap_err();
    assert!(matches!(
        err,
        StoreError::Constraint(ConstraintViolation::DuplicateKey { table: "countries" })
    ));
    assert_eq!(
        context.find_country("BE").unwrap().unwrap().description,
        "Belgium"
    );
}

pub fn countries_are_ordered_by_code<B: ContextBuilder>(builder: B) {
    let mut context = builder.build_context().unwrap();
    for (code, name) in [
        ("US", "United States of America"),
        ("BE", "Belgium"),
        ("NL", "Netherlands"),
    ] {
        context.add_country(Country::new(code, name)).unwrap();
    }
    context.save_changes().unwrap();

    let codes: Vec<String> = builder
        .build_context()
        .unwrap()
        .countries()
        .unwrap()
        .into_iter()
        .map(|country| country.id)
        .collect();
    assert_eq!(codes, vec!["BE", "NL", "US"]);
}
