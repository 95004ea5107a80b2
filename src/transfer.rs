//! CSV import and export of the question bank.
//!
//! A data directory holds `categories.csv` and `questions.csv`, one row per
//! record with a header line. Importing makes the database match the files.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, import_categories};
use crate::db::queries::questions::{get_all_questions, import_questions};
use crate::db::{Category, Question};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Bad record in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Exporting to {}",
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Both files are parsed before anything is written, and the write happens
/// in one transaction.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing from {}",
        dir.display()
    );

    let mut tx = pool.begin().await?;
    import_categories(&mut *tx, categories).await?;
    import_questions(&mut *tx, questions).await?;
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::questions::{create_question, count_questions};
    use crate::db::tests::memory_pool;
    use crate::db::NewQuestion;

    #[tokio::test]
    async fn export_then_import_restores_bank() {
        let pool = memory_pool().await;
        create_question(
            &pool,
            &NewQuestion {
                question: "Which planet is known as the \"Red Planet\"?".to_owned(),
                answer: "Mars".to_owned(),
                category: 1,
                difficulty: 2,
            },
        )
        .await
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        export_data(&pool, dir.path()).await.unwrap();

        let fresh = memory_pool().await;
        import_data(&fresh, dir.path()).await.unwrap();

        assert_eq!(
            get_all_questions(&fresh).await.unwrap(),
            get_all_questions(&pool).await.unwrap()
        );
        assert_eq!(get_all_categories(&fresh).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn import_of_bad_file_leaves_database_untouched() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES_FILE), "id,type\n1,Science\n").unwrap();
        std::fs::write(
            dir.path().join(QUESTIONS_FILE),
            "id,question,answer,category,difficulty\n1,Q,A,one,2\n",
        )
        .unwrap();

        assert!(import_data(&pool, dir.path()).await.is_err());
        assert_eq!(get_all_categories(&pool).await.unwrap().len(), 6);
        assert_eq!(count_questions(&pool).await.unwrap(), 0);
    }
}
