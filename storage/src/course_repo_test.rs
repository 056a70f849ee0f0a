//! Unit tests for CourseRepository ordering and filtering.

use crate::course_repo::CourseRepository;
use crate::sqlite_pool::SqlitePoolManager;

async fn test_repo() -> (CourseRepository, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("courses.db");
    let pool = SqlitePoolManager::new(path.to_str().unwrap())
        .await
        .expect("Failed to create pool");
    let repo = CourseRepository::new(pool)
        .await
        .expect("Failed to create repository");
    (repo, dir)
}

#[tokio::test]
async fn test_active_courses_ordered_and_filtered() {
    let (repo, _dir) = test_repo().await;

    repo.insert_course("Engenharia de Software", 2, true)
        .await
        .unwrap();
    repo.insert_course("Ciência da Computação", 1, true)
        .await
        .unwrap();
    // Same order as the first, must sort by name within it.
    repo.insert_course("Análise de Sistemas", 2, true)
        .await
        .unwrap();
    repo.insert_course("Curso Desativado", 0, false).await.unwrap();

    let courses = repo.active_courses().await.unwrap();
    let names: Vec<&str> = courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Ciência da Computação",
            "Análise de Sistemas",
            "Engenharia de Software"
        ]
    );
}

#[tokio::test]
async fn test_default_terms_ordered_by_priority_then_term() {
    let (repo, _dir) = test_repo().await;

    let course = repo.insert_course("Engenharia", 0, true).await.unwrap();
    repo.insert_term(course, "Django", 1, true).await.unwrap();
    repo.insert_term(course, "Python", 2, true).await.unwrap();
    repo.insert_term(course, "Estágio TI", 1, true).await.unwrap();
    repo.insert_term(course, "Cobol", 5, false).await.unwrap();

    let terms = repo.default_terms(course).await.unwrap();
    let names: Vec<&str> = terms.iter().map(|t| t.term.as_str()).collect();
    // Priority descending, ties broken by term; non-default excluded.
    assert_eq!(names, vec!["Python", "Django", "Estágio TI"]);
}

#[tokio::test]
async fn test_default_terms_scoped_to_course() {
    let (repo, _dir) = test_repo().await;

    let eng = repo.insert_course("Engenharia", 0, true).await.unwrap();
    let adm = repo.insert_course("Administração", 1, true).await.unwrap();
    repo.insert_term(eng, "Python", 1, true).await.unwrap();
    repo.insert_term(adm, "Excel", 1, true).await.unwrap();

    let terms = repo.default_terms(eng).await.unwrap();
    assert_eq!(terms.len(), 1);
    assert_eq!(terms[0].term, "Python");
}

#[tokio::test]
async fn test_find_course_and_term() {
    let (repo, _dir) = test_repo().await;

    let course = repo.insert_course("Engenharia", 0, true).await.unwrap();
    let term = repo.insert_term(course, "Python", 2, true).await.unwrap();

    assert_eq!(
        repo.find_course(course).await.unwrap().unwrap().name,
        "Engenharia"
    );
    assert_eq!(repo.find_term(term).await.unwrap().unwrap().term, "Python");
    assert!(repo.find_course(9999).await.unwrap().is_none());
}
