//! Integration tests for news, documents, contact messages, and the
//! dirigente registry.

mod common;

use common::*;
use scoutdesk::core::db::{
    ContactRepository, DirigenteRole, DirigenteUpdate, DocumentCategory, DocumentRepository,
    NewContactMessage, NewDirigente, NewDocumentEntry, NewNewsPost, NewsPostUpdate,
    NewsRepository,
};

#[tokio::test]
async fn test_news_listing_is_newest_first() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    db.add_news(&NewNewsPost {
        title: "Inscrições abertas".to_string(),
        body: "As inscrições para 2026 estão abertas.".to_string(),
        published_at: Some("2026-01-15".to_string()),
    })
    .await?;
    db.add_news(&NewNewsPost {
        title: "Acampamento confirmado".to_string(),
        body: "Saída dia 18 de julho.".to_string(),
        published_at: Some("2026-06-30".to_string()),
    })
    .await?;

    let posts = db.get_news().await?;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "Acampamento confirmado");

    // Unpublish the older post; other fields survive the patch
    let update = NewsPostUpdate {
        published_at: Some(None),
        ..Default::default()
    };
    let unpublished = db.update_news(&posts[1], &update).await?;
    assert_eq!(unpublished.published_at, None);
    assert_eq!(unpublished.title, "Inscrições abertas");

    db.delete_news(unpublished).await?;
    assert_eq!(db.get_news().await?.len(), 1);

    // Empty body is rejected before storage
    let invalid = db
        .add_news(&NewNewsPost {
            title: "Sem corpo".to_string(),
            body: "  ".to_string(),
            published_at: None,
        })
        .await;
    assert!(invalid.is_err());
    Ok(())
}

#[tokio::test]
async fn test_document_registry_with_category_lookup() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    db.add_document(&NewDocumentEntry {
        title: "Ficha de inscrição".to_string(),
        category: DocumentCategory::Formularios,
        url: "https://example.org/ficha.pdf".to_string(),
    })
    .await?;
    db.add_document(&NewDocumentEntry {
        title: "Ata de janeiro".to_string(),
        category: DocumentCategory::Atas,
        url: "https://example.org/ata-jan.pdf".to_string(),
    })
    .await?;

    let formularios = db
        .get_documents_in_category(DocumentCategory::Formularios)
        .await?;
    assert_eq!(formularios.len(), 1);
    assert_eq!(formularios[0].title, "Ficha de inscrição");

    // Category round-trips through its wire name
    assert_eq!(DocumentCategory::Formularios.as_str(), "formularios");
    assert_eq!(
        "formularios".parse::<DocumentCategory>()?,
        DocumentCategory::Formularios
    );

    // A non-http url is rejected
    let invalid = db
        .add_document(&NewDocumentEntry {
            title: "Arquivo local".to_string(),
            category: DocumentCategory::Outros,
            url: "file:///tmp/x.pdf".to_string(),
        })
        .await;
    assert!(invalid.is_err());

    let ata = db
        .get_documents_in_category(DocumentCategory::Atas)
        .await?
        .into_iter()
        .next()
        .unwrap();
    db.delete_document(ata).await?;
    assert_eq!(db.get_documents().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_contact_message_handling() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    let message = db
        .add_contact_message(&NewContactMessage {
            name: "Visitante".to_string(),
            email: "visitante@example.org".to_string(),
            subject: Some("Como participar?".to_string()),
            message: "Gostaria de inscrever meu filho.".to_string(),
            received_at: Some("2026-08-01".to_string()),
            handled: false,
        })
        .await?;
    assert!(!message.handled);

    let handled = db.set_contact_handled(&message, true).await?;
    assert!(handled.handled);

    db.delete_contact_message(handled).await?;
    assert!(db.get_contact_messages().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_dirigente_crud() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    let dirigente = db
        .add_dirigente(&NewDirigente {
            name: "Marcos Paulo".to_string(),
            role: DirigenteRole::Chefe,
            section: Some(Section::TropaEscoteira),
            email: Some("marcos@example.org".to_string()),
            phone: None,
            status: MemberStatus::Active,
        })
        .await?;

    let fetched = db
        .get_dirigente_by_id(dirigente.id)
        .await?
        .expect("dirigente exists");
    assert_eq!(fetched.role, DirigenteRole::Chefe);
    assert_eq!(fetched.section, Some(Section::TropaEscoteira));

    // Promote to director and detach from the section
    let update = DirigenteUpdate {
        role: Some(DirigenteRole::Diretor),
        section: Some(None),
        ..Default::default()
    };
    let fetched = db.update_dirigente(&fetched, &update).await?;
    assert_eq!(fetched.role, DirigenteRole::Diretor);
    assert_eq!(fetched.section, None);
    assert_eq!(fetched.name, "Marcos Paulo");

    db.delete_dirigente(fetched).await?;
    assert!(db.get_dirigentes().await?.is_empty());

    // Broken email is rejected
    let invalid = db
        .add_dirigente(&NewDirigente {
            name: "Sem Email".to_string(),
            role: DirigenteRole::Apoio,
            section: None,
            email: Some("nao-e-email".to_string()),
            phone: None,
            status: MemberStatus::Active,
        })
        .await;
    assert!(invalid.is_err());
    Ok(())
}
