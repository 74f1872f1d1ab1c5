use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use postcraft::post::{
    CaptionRequest, GENERATION_FAILED_MESSAGE, PROMPT_FOR_INPUT_MESSAGE, Platform, PostError,
    PostRequest, PostState, SentimentRequest,
    testing::{
        CaptionHook, SentimentHook, boxed, caption_failing, caption_returning,
        generator_with_hooks, sentiment_failing, sentiment_returning,
    },
};

fn counting_sentiment(calls: Arc<AtomicUsize>) -> SentimentHook {
    let inner = sentiment_returning("POSITIVE");
    Arc::new(move |req: SentimentRequest| {
        calls.fetch_add(1, Ordering::SeqCst);
        inner(req)
    })
}

#[tokio::test]
async fn given_blank_topic_when_generating_then_prompt_tuple_is_returned_without_calls() {
    let caption_calls = Arc::new(AtomicUsize::new(0));
    let sentiment_calls = Arc::new(AtomicUsize::new(0));
    let counter = caption_calls.clone();
    let caption: CaptionHook = Arc::new(move |_req: CaptionRequest| {
        counter.fetch_add(1, Ordering::SeqCst);
        boxed(async { Ok::<_, PostError>("unused".to_string()) })
    });
    let generator = generator_with_hooks(caption, counting_sentiment(sentiment_calls.clone()), 1);

    for topic in ["", "   ", "\t\n"] {
        let outcome = generator
            .generate(&PostRequest::new(topic, Platform::Twitter))
            .await;
        assert_eq!(outcome.state, PostState::AwaitingInput);
        assert_eq!(outcome.post.caption, PROMPT_FOR_INPUT_MESSAGE);
        assert_eq!(outcome.post.emojis, "");
        assert_eq!(outcome.post.hashtags, "");
    }
    assert_eq!(caption_calls.load(Ordering::SeqCst), 0);
    assert_eq!(sentiment_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_caption_failure_when_generating_then_failure_tuple_is_returned() {
    let sentiment_calls = Arc::new(AtomicUsize::new(0));
    let caption = caption_failing("backend unavailable");
    let generator = generator_with_hooks(caption, counting_sentiment(sentiment_calls.clone()), 2);

    let outcome = generator
        .generate(&PostRequest::new("Breaking news in tech", Platform::Twitter))
        .await;

    assert_eq!(outcome.state, PostState::Failed);
    assert_eq!(outcome.post.caption, GENERATION_FAILED_MESSAGE);
    assert_eq!(outcome.post.emojis, "");
    assert_eq!(outcome.post.hashtags, "");
    assert_eq!(
        sentiment_calls.load(Ordering::SeqCst),
        0,
        "emoji tagging is skipped after a caption failure"
    );
}

#[tokio::test]
async fn given_classifier_failure_when_generating_then_fallback_emojis_are_used() {
    let sentiment = sentiment_failing("model is loading");
    let generator = generator_with_hooks(caption_returning("Big day ahead."), sentiment, 3);

    let outcome = generator
        .generate(&PostRequest::new(
            "Exciting career opportunities",
            Platform::LinkedIn,
        ))
        .await;

    assert_eq!(outcome.state, PostState::Complete);
    assert_eq!(outcome.post.caption, "Big day ahead.");
    assert_eq!(outcome.post.emojis, "😊😊😊");
    assert!(
        outcome
            .post
            .hashtags
            .starts_with("#exciting #career #opportunities ")
    );
}

#[tokio::test]
async fn given_topic_when_generating_then_raw_topic_is_prompt_and_caption_is_classified() {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let classified = Arc::new(Mutex::new(Vec::new()));

    let seen_prompts = prompts.clone();
    let caption: CaptionHook = Arc::new(move |req: CaptionRequest| {
        seen_prompts
            .lock()
            .expect("lock")
            .push((req.prompt.clone(), req.options.max_output_tokens));
        boxed(async { Ok::<_, PostError>("  Coffee first, then the world.\n".to_string()) })
    });
    let seen_texts = classified.clone();
    let inner = sentiment_returning("POSITIVE");
    let sentiment: SentimentHook = Arc::new(move |req: SentimentRequest| {
        seen_texts.lock().expect("lock").push(req.text.clone());
        inner(req)
    });
    let generator = generator_with_hooks(caption, sentiment, 4);

    let outcome = generator
        .generate(&PostRequest::new(
            "Morning coffee and productivity",
            Platform::Instagram,
        ))
        .await;

    assert_eq!(outcome.state, PostState::Complete);
    assert_eq!(outcome.post.caption, "Coffee first, then the world.");
    assert_eq!(
        prompts.lock().expect("lock").as_slice(),
        &[("Morning coffee and productivity".to_string(), 100)]
    );
    assert_eq!(
        classified.lock().expect("lock").as_slice(),
        &["Coffee first, then the world.".to_string()]
    );
}

#[tokio::test]
async fn given_empty_generated_caption_when_generating_then_post_is_still_complete() {
    let generator = generator_with_hooks(caption_returning("   "), sentiment_returning("NEUTRAL"), 5);

    let outcome = generator
        .generate(&PostRequest::new("Morning coffee", Platform::Instagram))
        .await;

    assert_eq!(outcome.state, PostState::Complete);
    assert_eq!(outcome.post.caption, "");
    assert_eq!(outcome.post.emojis.chars().count(), 3);
}

#[tokio::test]
async fn given_same_seed_when_generating_then_output_is_reproducible() {
    let request = PostRequest::new("Morning coffee and productivity", Platform::Instagram);
    let first = generator_with_hooks(caption_returning("c"), sentiment_returning("POSITIVE"), 42)
        .generate(&request)
        .await;
    let second = generator_with_hooks(caption_returning("c"), sentiment_returning("POSITIVE"), 42)
        .generate(&request)
        .await;
    assert_eq!(first, second);
}
