use crate::model::enums::PostSort;
use crate::model::post::{Post, PostPath};
use crate::query::Direction;
use crate::schema::post;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

/// Bound and ordering of a post listing, resolved from the client's cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOrder {
    /// Ordered by `(created, id)`, bounded exclusively by post id.
    Flat { since: Option<i64> },
    /// Ordered by path, bounded exclusively by the cursor post's path.
    Tree { since: Option<PostPath> },
    /// Top-level posts ordered by id, bounded exclusively by the cursor post's root,
    /// each followed by all of its descendants in path order.
    ParentTree { since_root: Option<i64> },
}

impl PostOrder {
    /// Resolves the cursor `since` for the given `sort`.
    ///
    /// A `since` of 0 means no cursor. Tree orderings need the cursor post's path, which is retrieved with `find_path`.
    /// Returns `None` when the cursor references a post that doesn't exist, in which case the page is empty.
    pub fn new<F>(sort: PostSort, since: Option<i64>, find_path: F) -> QueryResult<Option<Self>>
    where
        F: FnOnce(i64) -> QueryResult<Option<PostPath>>,
    {
        let since = since.filter(|&id| id != 0);
        let order = match (sort, since) {
            (PostSort::Flat, since) => Self::Flat { since },
            (PostSort::Tree, None) => Self::Tree { since: None },
            (PostSort::ParentTree, None) => Self::ParentTree { since_root: None },
            (PostSort::Tree, Some(id)) => match find_path(id)? {
                Some(path) => Self::Tree { since: Some(path) },
                None => return Ok(None),
            },
            (PostSort::ParentTree, Some(id)) => match find_path(id)?.and_then(|path| path.root_id()) {
                Some(root) => Self::ParentTree { since_root: Some(root) },
                None => return Ok(None),
            },
        };
        Ok(Some(order))
    }
}

/// Retrieves the path of the post with id `post_id`.
pub fn path(conn: &mut PgConnection, post_id: i64) -> QueryResult<Option<PostPath>> {
    post::table
        .select(post::path)
        .filter(post::id.eq(post_id))
        .first(conn)
        .optional()
}

/// Retrieves one page of posts of the thread `thread_id`.
///
/// For [`PostOrder::ParentTree`], `limit` bounds the number of top-level posts rather than the number of rows.
pub fn list(
    conn: &mut PgConnection,
    thread_id: i64,
    order: &PostOrder,
    direction: Direction,
    limit: i64,
) -> QueryResult<Vec<Post>> {
    let mut query = post::table
        .select(Post::as_select())
        .filter(post::thread_id.eq(thread_id))
        .into_boxed();

    match order {
        PostOrder::Flat { since } => {
            match direction {
                Direction::Ascending => {
                    query = query
                        .filter(post::id.gt(since.unwrap_or(0)))
                        .order((post::created.asc(), post::id.asc()));
                }
                Direction::Descending => {
                    if let Some(since) = since {
                        query = query.filter(post::id.lt(since));
                    }
                    query = query.order((post::created.desc(), post::id.desc()));
                }
            }
            query.limit(limit).load(conn)
        }
        PostOrder::Tree { since } => {
            match direction {
                Direction::Ascending => {
                    if let Some(since) = since {
                        query = query.filter(post::path.gt(since));
                    }
                    query = query.order(post::path.asc());
                }
                Direction::Descending => {
                    if let Some(since) = since {
                        query = query.filter(post::path.lt(since));
                    }
                    query = query.order(post::path.desc());
                }
            }
            query.limit(limit).load(conn)
        }
        PostOrder::ParentTree { since_root } => {
            let roots = root_ids(conn, thread_id, *since_root, direction, limit)?;
            if roots.is_empty() {
                return Ok(Vec::new());
            }

            query = query.filter(root_id().eq_any(roots));
            query = match direction {
                Direction::Ascending => query.order((root_id().asc(), post::path.asc())),
                Direction::Descending => query.order((root_id().desc(), post::path.asc())),
            };
            query.load(conn)
        }
    }
}

/// First element of a post's path, i.e. the id of the top-level post it descends from.
fn root_id() -> diesel::expression::SqlLiteral<BigInt> {
    sql::<BigInt>("post.path[1]")
}

/// Retrieves ids of up to `limit` top-level posts of the thread `thread_id`, bounded exclusively by `since_root`.
fn root_ids(
    conn: &mut PgConnection,
    thread_id: i64,
    since_root: Option<i64>,
    direction: Direction,
    limit: i64,
) -> QueryResult<Vec<i64>> {
    let mut query = post::table
        .select(post::id)
        .filter(post::thread_id.eq(thread_id))
        .filter(post::parent.eq(0))
        .into_boxed();
    match direction {
        Direction::Ascending => {
            if let Some(since_root) = since_root {
                query = query.filter(post::id.gt(since_root));
            }
            query = query.order(post::id.asc());
        }
        Direction::Descending => {
            if let Some(since_root) = since_root {
                query = query.filter(post::id.lt(since_root));
            }
            query = query.order(post::id.desc());
        }
    }
    query.limit(limit).load(conn)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::ApiResult;
    use crate::model::forum::Forum;
    use crate::model::thread::Thread;
    use crate::schema::forum;
    use crate::test::*;
    use crate::update;
    use crate::update::post::PostSubmission;
    use serial_test::parallel;

    fn no_lookup(_: i64) -> QueryResult<Option<PostPath>> {
        panic!("Cursor lookup should not be needed")
    }

    fn missing(_: i64) -> QueryResult<Option<PostPath>> {
        Ok(None)
    }

    fn found(id: i64) -> QueryResult<Option<PostPath>> {
        Ok(Some(PostPath::from(vec![3, 8, id])))
    }

    #[test]
    fn flat_never_looks_up_cursor() {
        let order = PostOrder::new(PostSort::Flat, None, no_lookup).unwrap();
        assert_eq!(order, Some(PostOrder::Flat { since: None }));

        let order = PostOrder::new(PostSort::Flat, Some(12), no_lookup).unwrap();
        assert_eq!(order, Some(PostOrder::Flat { since: Some(12) }));
    }

    #[test]
    fn tree_uses_cursor_path() {
        let order = PostOrder::new(PostSort::Tree, None, no_lookup).unwrap();
        assert_eq!(order, Some(PostOrder::Tree { since: None }));

        let order = PostOrder::new(PostSort::Tree, Some(12), found).unwrap();
        let expected_path = PostPath::from(vec![3, 8, 12]);
        assert_eq!(order, Some(PostOrder::Tree { since: Some(expected_path) }));
    }

    #[test]
    fn parent_tree_uses_cursor_root() {
        let order = PostOrder::new(PostSort::ParentTree, None, no_lookup).unwrap();
        assert_eq!(order, Some(PostOrder::ParentTree { since_root: None }));

        let order = PostOrder::new(PostSort::ParentTree, Some(12), found).unwrap();
        assert_eq!(order, Some(PostOrder::ParentTree { since_root: Some(3) }));
    }

    #[test]
    fn zero_cursor_starts_from_beginning() {
        assert_eq!(PostOrder::new(PostSort::Flat, Some(0), no_lookup).unwrap(), Some(PostOrder::Flat { since: None }));
        assert_eq!(PostOrder::new(PostSort::Tree, Some(0), no_lookup).unwrap(), Some(PostOrder::Tree { since: None }));
        assert_eq!(
            PostOrder::new(PostSort::ParentTree, Some(0), no_lookup).unwrap(),
            Some(PostOrder::ParentTree { since_root: None })
        );
    }

    #[test]
    fn missing_cursor_gives_empty_page() {
        assert_eq!(PostOrder::new(PostSort::Tree, Some(404), missing).unwrap(), None);
        assert_eq!(PostOrder::new(PostSort::ParentTree, Some(404), missing).unwrap(), None);
    }

    /// Builds a thread shaped like
    /// ```text
    /// a
    /// ├── b
    /// │   └── d
    /// └── e
    /// c
    /// └── f
    /// ```
    /// Returns the ids `[a, b, c, d, e, f]`.
    fn create_tree(conn: &mut PgConnection, thread: &Thread, author: &str) -> ApiResult<[i64; 6]> {
        let submission = |parent| PostSubmission {
            parent,
            author,
            message: "",
        };
        let first = update::post::create_posts(conn, thread, &[submission(0)])?;
        let a = first[0].id;
        let second = update::post::create_posts(conn, thread, &[submission(a), submission(0)])?;
        let (b, c) = (second[0].id, second[1].id);
        let third = update::post::create_posts(conn, thread, &[submission(b), submission(a), submission(c)])?;
        Ok([a, b, c, third[0].id, third[1].id, third[2].id])
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|post| post.id).collect()
    }

    /// Concatenates every page of a listing, using the last post of each page as the next cursor.
    fn collect_pages(
        conn: &mut PgConnection,
        thread_id: i64,
        sort: PostSort,
        direction: Direction,
        limit: i64,
    ) -> ApiResult<Vec<i64>> {
        let mut all_ids = Vec::new();
        let mut since = None;
        loop {
            let order = PostOrder::new(sort, since, |id| path(conn, id))?.unwrap();
            let page = list(conn, thread_id, &order, direction, limit)?;
            match page.last() {
                Some(last) => since = Some(last.id),
                None => break,
            }
            all_ids.extend(ids(&page));
        }
        Ok(all_ids)
    }

    #[test]
    #[parallel]
    #[ignore = "requires a running PostgreSQL database"]
    fn tree_orderings() {
        test_transaction(|conn| {
            let (user, thread) = create_test_discussion(conn, "tree_author")?;
            let [a, b, c, d, e, f] = create_tree(conn, &thread, &user.nickname)?;

            let order = PostOrder::Tree { since: None };
            let posts = list(conn, thread.id, &order, Direction::Ascending, 100)?;
            assert_eq!(ids(&posts), [a, b, d, e, c, f]);
            let posts = list(conn, thread.id, &order, Direction::Descending, 100)?;
            assert_eq!(ids(&posts), [f, c, e, d, b, a]);

            let order = PostOrder::ParentTree { since_root: None };
            let posts = list(conn, thread.id, &order, Direction::Ascending, 1)?;
            assert_eq!(ids(&posts), [a, b, d, e]);
            let posts = list(conn, thread.id, &order, Direction::Descending, 1)?;
            assert_eq!(ids(&posts), [c, f]);
            let posts = list(conn, thread.id, &order, Direction::Descending, 2)?;
            assert_eq!(ids(&posts), [c, f, a, b, d, e]);

            let order = PostOrder::new(PostSort::ParentTree, Some(d), |id| path(conn, id))?.unwrap();
            let posts = list(conn, thread.id, &order, Direction::Ascending, 1)?;
            assert_eq!(ids(&posts), [c, f]);

            let order = PostOrder::new(PostSort::Tree, Some(d), |id| path(conn, id))?.unwrap();
            let posts = list(conn, thread.id, &order, Direction::Ascending, 2)?;
            assert_eq!(ids(&posts), [e, c]);
            Ok(())
        });
    }

    #[test]
    #[parallel]
    #[ignore = "requires a running PostgreSQL database"]
    fn paging_covers_every_post() {
        test_transaction(|conn| {
            let (user, thread) = create_test_discussion(conn, "paging_author")?;
            create_tree(conn, &thread, &user.nickname)?;
            create_tree(conn, &thread, &user.nickname)?;

            for sort in [PostSort::Flat, PostSort::Tree] {
                let everything = PostOrder::new(sort, None, |id| path(conn, id))?.unwrap();
                let expected = ids(&list(conn, thread.id, &everything, Direction::Ascending, 100)?);
                assert_eq!(expected.len(), 12);

                for limit in [1, 2, 5] {
                    let ascending = collect_pages(conn, thread.id, sort, Direction::Ascending, limit)?;
                    assert_eq!(ascending, expected, "{sort} ascending with limit {limit}");

                    let mut descending = collect_pages(conn, thread.id, sort, Direction::Descending, limit)?;
                    descending.reverse();
                    assert_eq!(descending, expected, "{sort} descending with limit {limit}");
                }
            }

            let flat = ids(&list(conn, thread.id, &PostOrder::Flat { since: None }, Direction::Ascending, 100)?);
            let mut sorted = flat.clone();
            sorted.sort_unstable();
            assert_eq!(flat, sorted);
            Ok(())
        });
    }

    #[test]
    #[parallel]
    #[ignore = "requires a running PostgreSQL database"]
    fn posts_of_other_threads_are_excluded() {
        test_transaction(|conn| {
            let (user, thread) = create_test_discussion(conn, "isolated_author")?;
            let forum: Forum = forum::table
                .select(Forum::as_select())
                .filter(forum::slug.eq(&thread.forum_slug))
                .first(conn)?;
            let other_thread = create_test_thread(conn, &forum, &user)?;
            create_tree(conn, &thread, &user.nickname)?;
            create_tree(conn, &other_thread, &user.nickname)?;

            for order in [
                PostOrder::Flat { since: None },
                PostOrder::Tree { since: None },
                PostOrder::ParentTree { since_root: None },
            ] {
                let posts = list(conn, thread.id, &order, Direction::Ascending, 100)?;
                assert_eq!(posts.len(), 6);
                assert!(posts.iter().all(|post| post.thread_id == thread.id));
            }
            Ok(())
        });
    }
}
