//! Integration tests for the outline repository layer.
//!
//! Exercises the repositories against a real database:
//! - Auto-computed sibling order on create
//! - Atomic auto-child creation
//! - Child counting (the delete guard's backing query)
//! - Recursive descendant check (the cycle guard's backing query)
//! - Relation uniqueness
//! - Word count recomputation on content update

use sqlx::PgPool;
use storyloom_db::models::character::CreateCharacter;
use storyloom_db::models::plot_element::{NewPlotElement, UpdatePlotElement};
use storyloom_db::models::project::CreateProject;
use storyloom_db::models::world_setting::CreateWorldSetting;
use storyloom_db::repositories::{
    CharacterRepo, ParentFilter, PlotElementRepo, ProjectRepo, WorldSettingRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_project(pool: &PgPool, name: &str) -> i64 {
    ProjectRepo::create(
        pool,
        name,
        &CreateProject {
            name: Some(name.to_string()),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_element(project_id: i64, title: &str, kind: &str, parent_id: Option<i64>) -> NewPlotElement {
    NewPlotElement {
        project_id,
        title: title.to_string(),
        kind: kind.to_string(),
        parent_id,
        sort_order: None,
        status: None,
        summary: None,
        content: None,
        notes: None,
        mood: None,
        pov: None,
        target_words: None,
        auto_create_children: false,
    }
}

// ---------------------------------------------------------------------------
// Test: sibling order auto-computation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_assigns_sequential_orders(pool: PgPool) {
    let project_id = new_project(&pool, "Orders").await;
    let part = PlotElementRepo::create(&pool, &new_element(project_id, "Pt", "part", None))
        .await
        .unwrap();
    assert_eq!(part.sort_order, 1);

    for expected in 1..=3 {
        let chapter = PlotElementRepo::create(
            &pool,
            &new_element(project_id, &format!("Ch{expected}"), "chapter", Some(part.id)),
        )
        .await
        .unwrap();
        assert_eq!(chapter.sort_order, expected);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_order_groups_are_per_parent_and_kind(pool: PgPool) {
    let project_id = new_project(&pool, "Groups").await;
    let a = PlotElementRepo::create(&pool, &new_element(project_id, "A", "part", None))
        .await
        .unwrap();
    let b = PlotElementRepo::create(&pool, &new_element(project_id, "B", "part", None))
        .await
        .unwrap();
    assert_eq!(b.sort_order, 2);

    // Children of different parents each start at 1.
    let ch_a = PlotElementRepo::create(&pool, &new_element(project_id, "ChA", "chapter", Some(a.id)))
        .await
        .unwrap();
    let ch_b = PlotElementRepo::create(&pool, &new_element(project_id, "ChB", "chapter", Some(b.id)))
        .await
        .unwrap();
    assert_eq!(ch_a.sort_order, 1);
    assert_eq!(ch_b.sort_order, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_explicit_order_is_respected(pool: PgPool) {
    let project_id = new_project(&pool, "Explicit").await;
    let mut input = new_element(project_id, "Ch", "chapter", None);
    input.sort_order = Some(7);
    let chapter = PlotElementRepo::create(&pool, &input).await.unwrap();
    assert_eq!(chapter.sort_order, 7);
}

// ---------------------------------------------------------------------------
// Test: auto-child creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_auto_child_created_for_book(pool: PgPool) {
    let project_id = new_project(&pool, "AutoChild").await;
    let mut input = new_element(project_id, "B", "book", None);
    input.auto_create_children = true;

    let book = PlotElementRepo::create(&pool, &input).await.unwrap();
    assert_eq!(book.kind, "book");
    assert_eq!(book.sort_order, 1);

    let children =
        PlotElementRepo::list_by_project(&pool, project_id, None, ParentFilter::Node(book.id))
            .await
            .unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].kind, "part");
    assert_eq!(children[0].sort_order, 1);
    assert_eq!(children[0].title, "Untitled part");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_no_auto_child_for_leaf_kinds(pool: PgPool) {
    let project_id = new_project(&pool, "LeafAuto").await;
    let mut input = new_element(project_id, "Ch", "chapter", None);
    input.auto_create_children = true;

    let chapter = PlotElementRepo::create(&pool, &input).await.unwrap();
    let count = PlotElementRepo::count_children(&pool, chapter.id).await.unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Test: child counting and descendant check
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_count_children(pool: PgPool) {
    let project_id = new_project(&pool, "Counts").await;
    let part = PlotElementRepo::create(&pool, &new_element(project_id, "Pt", "part", None))
        .await
        .unwrap();
    assert_eq!(PlotElementRepo::count_children(&pool, part.id).await.unwrap(), 0);

    PlotElementRepo::create(&pool, &new_element(project_id, "Ch1", "chapter", Some(part.id)))
        .await
        .unwrap();
    PlotElementRepo::create(&pool, &new_element(project_id, "Ch2", "chapter", Some(part.id)))
        .await
        .unwrap();
    assert_eq!(PlotElementRepo::count_children(&pool, part.id).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_is_descendant_walks_the_subtree(pool: PgPool) {
    let project_id = new_project(&pool, "Descendants").await;
    let book = PlotElementRepo::create(&pool, &new_element(project_id, "B", "book", None))
        .await
        .unwrap();
    let part = PlotElementRepo::create(&pool, &new_element(project_id, "Pt", "part", Some(book.id)))
        .await
        .unwrap();
    let chapter =
        PlotElementRepo::create(&pool, &new_element(project_id, "Ch", "chapter", Some(part.id)))
            .await
            .unwrap();

    assert!(PlotElementRepo::is_descendant(&pool, book.id, chapter.id).await.unwrap());
    assert!(PlotElementRepo::is_descendant(&pool, book.id, book.id).await.unwrap());
    assert!(!PlotElementRepo::is_descendant(&pool, chapter.id, book.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: update semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_content_update_recomputes_word_count(pool: PgPool) {
    let project_id = new_project(&pool, "Words").await;
    let scene = PlotElementRepo::create(&pool, &new_element(project_id, "Sc", "scene", None))
        .await
        .unwrap();
    assert_eq!(scene.word_count, 0);

    let updated = PlotElementRepo::update(
        &pool,
        scene.id,
        &UpdatePlotElement {
            content: Some("one two  three".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("row should exist");

    // Non-whitespace characters only.
    assert_eq!(updated.word_count, 11);

    // A title-only update must not touch the stored count.
    let updated = PlotElementRepo::update(
        &pool,
        scene.id,
        &UpdatePlotElement {
            title: Some("Renamed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.word_count, 11);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_can_be_cleared_with_explicit_null(pool: PgPool) {
    let project_id = new_project(&pool, "Reparent").await;
    let part = PlotElementRepo::create(&pool, &new_element(project_id, "Pt", "part", None))
        .await
        .unwrap();
    let chapter =
        PlotElementRepo::create(&pool, &new_element(project_id, "Ch", "chapter", Some(part.id)))
            .await
            .unwrap();

    // Absent field leaves the parent untouched.
    let updated = PlotElementRepo::update(
        &pool,
        chapter.id,
        &UpdatePlotElement {
            title: Some("Ch!".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.parent_id, Some(part.id));

    // Explicit null clears it.
    let updated = PlotElementRepo::update(
        &pool,
        chapter.id,
        &UpdatePlotElement {
            parent_id: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.parent_id, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_nonexistent_returns_none(pool: PgPool) {
    let result = PlotElementRepo::update(
        &pool,
        999_999,
        &UpdatePlotElement {
            title: Some("Ghost".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: list filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_by_kind_and_parent(pool: PgPool) {
    let project_id = new_project(&pool, "Filters").await;
    let book = PlotElementRepo::create(&pool, &new_element(project_id, "B", "book", None))
        .await
        .unwrap();
    let part = PlotElementRepo::create(&pool, &new_element(project_id, "Pt", "part", Some(book.id)))
        .await
        .unwrap();
    PlotElementRepo::create(&pool, &new_element(project_id, "Ch", "chapter", Some(part.id)))
        .await
        .unwrap();

    let roots = PlotElementRepo::list_by_project(&pool, project_id, None, ParentFilter::Root)
        .await
        .unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, book.id);

    let chapters =
        PlotElementRepo::list_by_project(&pool, project_id, Some("chapter"), ParentFilter::Any)
            .await
            .unwrap();
    assert_eq!(chapters.len(), 1);

    let children =
        PlotElementRepo::list_by_project(&pool, project_id, None, ParentFilter::Node(book.id))
            .await
            .unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, part.id);
}

// ---------------------------------------------------------------------------
// Test: relation uniqueness and cleanup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_character_link_rejected(pool: PgPool) {
    let project_id = new_project(&pool, "Links").await;
    let chapter = PlotElementRepo::create(&pool, &new_element(project_id, "Ch", "chapter", None))
        .await
        .unwrap();
    let character = CharacterRepo::create(
        &pool,
        project_id,
        "Alice",
        &CreateCharacter {
            name: Some("Alice".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();

    let link = PlotElementRepo::link_character(&pool, chapter.id, character.id, Some("pov"), None)
        .await
        .unwrap();
    assert_eq!(link.name, "Alice");
    assert_eq!(link.importance, "minor");

    let result =
        PlotElementRepo::link_character(&pool, chapter.id, character.id, None, None).await;
    assert!(result.is_err(), "duplicate pair should violate uq constraint");

    let links = PlotElementRepo::character_links(&pool, &[chapter.id], false)
        .await
        .unwrap();
    assert_eq!(links.len(), 1, "exactly one relation row must exist");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_setting_link_rejected(pool: PgPool) {
    let project_id = new_project(&pool, "Places").await;
    let scene = PlotElementRepo::create(&pool, &new_element(project_id, "Sc", "scene", None))
        .await
        .unwrap();
    let setting = WorldSettingRepo::create(
        &pool,
        project_id,
        "Harbor",
        &CreateWorldSetting {
            name: Some("Harbor".to_string()),
            content: None,
        },
    )
    .await
    .unwrap();

    let link = PlotElementRepo::link_setting(&pool, scene.id, setting.id, Some("backdrop"))
        .await
        .unwrap();
    assert_eq!(link.name, "Harbor");
    assert_eq!(link.relevance.as_deref(), Some("backdrop"));

    let result = PlotElementRepo::link_setting(&pool, scene.id, setting.id, None).await;
    assert!(result.is_err(), "duplicate pair should violate uq constraint");

    let links = PlotElementRepo::setting_links(&pool, &[scene.id], false)
        .await
        .unwrap();
    assert_eq!(links.len(), 1, "exactly one relation row must exist");

    assert!(PlotElementRepo::unlink_setting(&pool, scene.id, setting.id)
        .await
        .unwrap());
    assert!(!PlotElementRepo::unlink_setting(&pool, scene.id, setting.id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unlink_character(pool: PgPool) {
    let project_id = new_project(&pool, "Unlink").await;
    let chapter = PlotElementRepo::create(&pool, &new_element(project_id, "Ch", "chapter", None))
        .await
        .unwrap();
    let character = CharacterRepo::create(
        &pool,
        project_id,
        "Bob",
        &CreateCharacter {
            name: Some("Bob".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();

    assert!(!PlotElementRepo::unlink_character(&pool, chapter.id, character.id)
        .await
        .unwrap());

    PlotElementRepo::link_character(&pool, chapter.id, character.id, None, None)
        .await
        .unwrap();
    assert!(PlotElementRepo::unlink_character(&pool, chapter.id, character.id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_element_cascades_relation_rows(pool: PgPool) {
    let project_id = new_project(&pool, "Cascade").await;
    let chapter = PlotElementRepo::create(&pool, &new_element(project_id, "Ch", "chapter", None))
        .await
        .unwrap();
    let character = CharacterRepo::create(
        &pool,
        project_id,
        "Eve",
        &CreateCharacter {
            name: Some("Eve".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();
    PlotElementRepo::link_character(&pool, chapter.id, character.id, None, None)
        .await
        .unwrap();

    assert!(PlotElementRepo::hard_delete(&pool, chapter.id).await.unwrap());

    let links = PlotElementRepo::character_links(&pool, &[chapter.id], false)
        .await
        .unwrap();
    assert!(links.is_empty());
    // The character itself survives.
    assert!(CharacterRepo::find_by_id(&pool, character.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_project_delete_cascades_whole_graph(pool: PgPool) {
    let project_id = new_project(&pool, "ProjectCascade").await;
    let book = PlotElementRepo::create(&pool, &new_element(project_id, "B", "book", None))
        .await
        .unwrap();
    PlotElementRepo::create(&pool, &new_element(project_id, "Pt", "part", Some(book.id)))
        .await
        .unwrap();

    assert!(ProjectRepo::hard_delete(&pool, project_id).await.unwrap());
    assert!(PlotElementRepo::find_by_id(&pool, book.id).await.unwrap().is_none());
}
